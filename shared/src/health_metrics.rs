//! Health metrics calculations module
//!
//! Provides calculations for BMI, BMR, TDEE, calorie and water goals, the
//! healthy weight range and time-to-goal estimates, plus the kcal totals
//! stored on meal and activity logs.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Closed Enums**: Every categorical input is an exhaustive `match`
//! 3. **Truncation vs Rounding**: Goals truncate toward zero, log kcal totals
//!    round half away from zero

use crate::errors::HealthError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calorie offset applied for weight loss / gain goals (~0.5 kg per week)
pub const CALORIE_ADJUSTMENT_KCAL: f64 = 500.0;

/// Base hydration requirement in ml per kg of body weight
pub const WATER_ML_PER_KG: f64 = 33.0;

/// Assumed safe rate of weight change used for time-to-goal estimates
pub const SAFE_WEEKLY_CHANGE_KG: f64 = 0.5;

/// Goal used for both calories and water when the user has no profile goal
pub const DEFAULT_DAILY_GOAL: i32 = 2000;

// ============================================================================
// Profile Enumerations
// ============================================================================

/// Gender used for the BMR offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    /// Any other value, including unrecognised stored values
    #[serde(other)]
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
        }
    }

    /// Parse a stored value, case-insensitively. Never fails.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "MALE" => Gender::Male,
            "FEMALE" => Gender::Female,
            _ => Gender::Other,
        }
    }

    /// Mifflin-St Jeor offset for this gender
    pub fn bmr_offset(&self) -> f64 {
        match self {
            Gender::Male => 5.0,
            Gender::Female => -161.0,
            // Average of the male and female offsets
            Gender::Other => -78.0,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Activity level for TDEE and hydration calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
    /// Unknown stored value; treated like `Sedentary` by every calculation
    #[serde(other)]
    Unrecognized,
}

impl ActivityLevel {
    /// All recognised levels, in ascending order of activity
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "SEDENTARY",
            ActivityLevel::LightlyActive => "LIGHTLY_ACTIVE",
            ActivityLevel::ModeratelyActive => "MODERATELY_ACTIVE",
            ActivityLevel::VeryActive => "VERY_ACTIVE",
            ActivityLevel::ExtraActive => "EXTRA_ACTIVE",
            ActivityLevel::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Parse a stored value, case-insensitively. Never fails.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "SEDENTARY" => ActivityLevel::Sedentary,
            "LIGHTLY_ACTIVE" => ActivityLevel::LightlyActive,
            "MODERATELY_ACTIVE" => ActivityLevel::ModeratelyActive,
            "VERY_ACTIVE" => ActivityLevel::VeryActive,
            "EXTRA_ACTIVE" => ActivityLevel::ExtraActive,
            _ => ActivityLevel::Unrecognized,
        }
    }

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
            ActivityLevel::Unrecognized => 1.2,
        }
    }

    /// Extra daily water in ml on top of the weight-based baseline
    pub fn water_bonus_ml(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 0.0,
            ActivityLevel::LightlyActive => 250.0,
            ActivityLevel::ModeratelyActive => 500.0,
            ActivityLevel::VeryActive => 750.0,
            ActivityLevel::ExtraActive => 1000.0,
            ActivityLevel::Unrecognized => 0.0,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
            ActivityLevel::Unrecognized => "Unknown activity level",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weight-trend goal driving the calorie offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainWeight,
    /// Unknown stored value; treated like `Maintain`
    #[serde(other)]
    Unrecognized,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "LOSE_WEIGHT",
            Goal::Maintain => "MAINTAIN",
            Goal::GainWeight => "GAIN_WEIGHT",
            Goal::Unrecognized => "UNRECOGNIZED",
        }
    }

    /// Parse a stored value, case-insensitively. Never fails.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "LOSE_WEIGHT" => Goal::LoseWeight,
            "MAINTAIN" => Goal::Maintain,
            "GAIN_WEIGHT" => Goal::GainWeight,
            _ => Goal::Unrecognized,
        }
    }

    /// Daily calorie offset relative to TDEE
    pub fn calorie_offset(&self) -> f64 {
        match self {
            Goal::LoseWeight => -CALORIE_ADJUSTMENT_KCAL,
            Goal::GainWeight => CALORIE_ADJUSTMENT_KCAL,
            Goal::Maintain => 0.0,
            Goal::Unrecognized => 0.0,
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Normal
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Weight interval (kg) that keeps BMI within 18.5-24.9 for a given height
pub fn ideal_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    (18.5 * height_m_sq, 24.9 * height_m_sq)
}

// ============================================================================
// BMR, TDEE and Goals
// ============================================================================

/// Calculate Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + offset(gender)
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: i32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    base + gender.bmr_offset()
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> f64 {
    bmr * activity_level.multiplier()
}

/// Daily calorie target for a goal, truncated toward zero
pub fn daily_calorie_goal(tdee: f64, goal: Goal) -> i32 {
    (tdee + goal.calorie_offset()) as i32
}

/// Recommended daily water intake in ml, truncated toward zero
pub fn daily_water_goal_ml(weight_kg: f64, activity_level: ActivityLevel) -> i32 {
    (weight_kg * WATER_ML_PER_KG + activity_level.water_bonus_ml()) as i32
}

/// Whole calendar years between `date_of_birth` and `today`
///
/// Returns 0 for a birth date in the future.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    today
        .years_since(date_of_birth)
        .map(|years| years as i32)
        .unwrap_or(0)
}

/// Weeks needed to reach `target_kg` at the safe rate of 0.5 kg/week
pub fn weeks_to_goal(current_kg: f64, target_kg: f64) -> i32 {
    let difference = (target_kg - current_kg).abs();
    (difference / SAFE_WEEKLY_CHANGE_KG).ceil() as i32
}

// ============================================================================
// Log kcal totals
// ============================================================================

/// Calories burned by an activity
///
/// kcal/min = MET × 3.5 × weight(kg) / 200, rounded half away from zero
pub fn activity_kcal(met: f64, weight_kg: f64, minutes: i32) -> i32 {
    let per_minute = met * 3.5 * weight_kg / 200.0;
    (per_minute * minutes as f64).round() as i32
}

/// Calories for a number of servings, rounded half away from zero
pub fn meal_kcal(kcal_per_serving: i32, servings: f64) -> i32 {
    (kcal_per_serving as f64 * servings).round() as i32
}

/// Progress toward a goal in percent, never reported above 100
pub fn percent_of_goal(value: f64, goal: f64) -> Result<f64, HealthError> {
    if goal <= 0.0 || !goal.is_finite() {
        return Err(HealthError::InvalidInput(format!(
            "goal must be positive, got {goal}"
        )));
    }
    Ok((value / goal * 100.0).min(100.0))
}

// ============================================================================
// Derived profile metrics
// ============================================================================

/// Raw profile inputs every derived metric depends on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricInputs {
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
}

/// Full set of fields derived from [`MetricInputs`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calorie_goal: i32,
    pub daily_water_goal_ml: i32,
}

/// Derive every profile metric, in dependency order:
/// age → BMI → BMR → TDEE → calorie goal → water goal.
pub fn derive_metrics(inputs: &MetricInputs, today: NaiveDate) -> DerivedMetrics {
    let age_years = age_on(inputs.date_of_birth, today);
    let bmi = calculate_bmi(inputs.weight_kg, inputs.height_cm);
    let bmr = calculate_bmr(inputs.weight_kg, inputs.height_cm, age_years, inputs.gender);
    let tdee = calculate_tdee(bmr, inputs.activity_level);
    let daily_calorie_goal = daily_calorie_goal(tdee, inputs.goal);
    let daily_water_goal_ml = daily_water_goal_ml(inputs.weight_kg, inputs.activity_level);

    DerivedMetrics {
        bmi,
        bmr,
        tdee,
        daily_calorie_goal,
        daily_water_goal_ml,
    }
}

/// Health insights shown alongside a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInsights {
    pub bmi: f64,
    pub bmi_category: String,
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calorie_goal: i32,
    pub daily_water_goal_ml: i32,
    pub ideal_weight_min: f64,
    pub ideal_weight_max: f64,
    /// Only present when a target weight is set
    pub weeks_to_goal: Option<i32>,
}

/// Build insights from already-derived metrics
pub fn health_insights(
    derived: &DerivedMetrics,
    height_cm: f64,
    current_weight_kg: f64,
    target_weight_kg: Option<f64>,
) -> HealthInsights {
    let (ideal_weight_min, ideal_weight_max) = ideal_weight_range_kg(height_cm);

    HealthInsights {
        bmi: derived.bmi,
        bmi_category: classify_bmi(derived.bmi).label().to_string(),
        bmr: derived.bmr,
        tdee: derived.tdee,
        daily_calorie_goal: derived.daily_calorie_goal,
        daily_water_goal_ml: derived.daily_water_goal_ml,
        ideal_weight_min,
        ideal_weight_max,
        weeks_to_goal: target_weight_kg.map(|target| weeks_to_goal(current_weight_kg, target)),
    }
}
