//! Data models for the Health Monitor application

use crate::health_metrics::{ActivityLevel, DerivedMetrics, Gender, Goal, MetricInputs};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Common accessors for every append/delete-only log kind
pub trait LogEntry {
    fn id(&self) -> Uuid;
    fn user_id(&self) -> Uuid;
    fn logged_at(&self) -> DateTime<Utc>;
}

/// A log kind whose entries carry an integer quantity that can be summed
/// over a time range (ml of water, kcal eaten, kcal burned).
pub trait Summable: LogEntry {
    fn quantity(&self) -> i64;
}

macro_rules! impl_log_entry {
    ($ty:ty) => {
        impl LogEntry for $ty {
            fn id(&self) -> Uuid {
                self.id
            }

            fn user_id(&self) -> Uuid {
                self.user_id
            }

            fn logged_at(&self) -> DateTime<Utc> {
                self.logged_at
            }
        }
    };
}

/// One profile per user; derived fields always match the inputs of the last save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub target_weight_kg: Option<f64>,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calorie_goal: i32,
    pub daily_water_goal_ml: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The raw inputs the derived fields are computed from
    pub fn metric_inputs(&self) -> MetricInputs {
        MetricInputs {
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            height_cm: self.height_cm,
            weight_kg: self.current_weight_kg,
            activity_level: self.activity_level,
            goal: self.goal,
        }
    }

    /// The derived fields as stored by the last save
    pub fn derived_metrics(&self) -> DerivedMetrics {
        DerivedMetrics {
            bmi: self.bmi,
            bmr: self.bmr,
            tdee: self.tdee,
            daily_calorie_goal: self.daily_calorie_goal,
            daily_water_goal_ml: self.daily_water_goal_ml,
        }
    }

    /// Overwrite every derived field at once
    pub fn apply_derived(&mut self, derived: &DerivedMetrics) {
        self.bmi = derived.bmi;
        self.bmr = derived.bmr;
        self.tdee = derived.tdee;
        self.daily_calorie_goal = derived.daily_calorie_goal;
        self.daily_water_goal_ml = derived.daily_water_goal_ml;
    }
}

/// Body weight measurement; BMI is computed from the profile height at insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightLogEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight_kg: f64,
    pub bmi: f64,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl_log_entry!(WeightLogEntry);

/// Water intake event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_ml: i32,
    pub logged_at: DateTime<Utc>,
}

impl_log_entry!(WaterLog);

impl Summable for WaterLog {
    fn quantity(&self) -> i64 {
        self.amount_ml as i64
    }
}

/// Catalog food item (reference data)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    /// Human readable serving description, e.g. "1 cup (240 ml)"
    pub serving: String,
    pub kcal_per_serving: i32,
}

/// Food intake event; the food name is copied at insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub servings: f64,
    pub total_kcal: i32,
    pub logged_at: DateTime<Utc>,
}

impl_log_entry!(MealLog);

impl Summable for MealLog {
    fn quantity(&self) -> i64 {
        self.total_kcal as i64
    }
}

/// Physical activity event with a snapshot of the body weight used for kcal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub met: f64,
    pub minutes: i32,
    pub weight_kg_at_time: f64,
    pub total_kcal: i32,
    pub logged_at: DateTime<Utc>,
}

impl_log_entry!(ActivityLog);

impl Summable for ActivityLog {
    fn quantity(&self) -> i64 {
        self.total_kcal as i64
    }
}

/// Registered account; the password hash never leaves the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Stored trimmed and lowercased
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub roles: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_metrics::derive_metrics;

    fn profile() -> Profile {
        let now = Utc::now();
        Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            height_cm: 165.0,
            current_weight_kg: 60.0,
            target_weight_kg: None,
            activity_level: ActivityLevel::LightlyActive,
            goal: Goal::Maintain,
            bmi: 0.0,
            bmr: 0.0,
            tdee: 0.0,
            daily_calorie_goal: 0,
            daily_water_goal_ml: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_derived_replaces_all_fields() {
        let mut p = profile();
        let derived = derive_metrics(&p.metric_inputs(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        p.apply_derived(&derived);

        assert_eq!(p.bmi, derived.bmi);
        assert_eq!(p.bmr, derived.bmr);
        assert_eq!(p.tdee, derived.tdee);
        assert_eq!(p.daily_calorie_goal, derived.daily_calorie_goal);
        assert_eq!(p.daily_water_goal_ml, 60 * 33 + 250);
        assert_eq!(p.derived_metrics(), derived);
    }

    #[test]
    fn test_summable_quantities() {
        let now = Utc::now();
        let water = WaterLog {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount_ml: 250,
            logged_at: now,
        };
        assert_eq!(water.quantity(), 250);
        assert_eq!(water.logged_at(), now);
    }

    #[test]
    fn test_user_json_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            full_name: "Ada Lovelace".into(),
            roles: "USER".into(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["full_name"], "Ada Lovelace");
    }
}
