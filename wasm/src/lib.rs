//! Health Monitor WASM Module
//!
//! Browser bindings for the profile metric calculator. Every function
//! delegates to `health_monitor_shared`, so the numbers match the server.
//! Enumerations are passed as strings (`"MALE"`, `"MODERATELY_ACTIVE"`,
//! `"LOSE_WEIGHT"`, ...) and parsed case-insensitively.

use chrono::NaiveDate;
use health_monitor_shared::{self as shared, ActivityLevel, Gender, Goal, MetricInputs};
use wasm_bindgen::prelude::*;

/// Calculate BMI from weight (kg) and height (cm)
#[wasm_bindgen]
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    shared::calculate_bmi(weight_kg, height_cm)
}

/// Category label: Underweight, Normal, Overweight or Obese
#[wasm_bindgen]
pub fn bmi_category(bmi: f64) -> String {
    shared::classify_bmi(bmi).label().to_string()
}

/// Mifflin-St Jeor BMR
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: i32, gender: &str) -> f64 {
    shared::calculate_bmr(weight_kg, height_cm, age_years, Gender::parse_lenient(gender))
}

#[wasm_bindgen]
pub fn calculate_tdee(bmr: f64, activity_level: &str) -> f64 {
    shared::calculate_tdee(bmr, ActivityLevel::parse_lenient(activity_level))
}

#[wasm_bindgen]
pub fn daily_calorie_goal(tdee: f64, goal: &str) -> i32 {
    shared::daily_calorie_goal(tdee, Goal::parse_lenient(goal))
}

#[wasm_bindgen]
pub fn daily_water_goal_ml(weight_kg: f64, activity_level: &str) -> i32 {
    shared::daily_water_goal_ml(weight_kg, ActivityLevel::parse_lenient(activity_level))
}

/// `[min, max]` in kg for a BMI of 18.5-24.9
#[wasm_bindgen]
pub fn ideal_weight_range_kg(height_cm: f64) -> Vec<f64> {
    let (min, max) = shared::ideal_weight_range_kg(height_cm);
    vec![min, max]
}

#[wasm_bindgen]
pub fn weeks_to_goal(current_kg: f64, target_kg: f64) -> i32 {
    shared::weeks_to_goal(current_kg, target_kg)
}

fn parse_date(name: &str, value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("{name} must be YYYY-MM-DD: {e}"))
}

fn derive_metrics_inner(
    gender: &str,
    date_of_birth: &str,
    height_cm: f64,
    weight_kg: f64,
    activity_level: &str,
    goal: &str,
    today: &str,
) -> Result<String, String> {
    let inputs = MetricInputs {
        gender: Gender::parse_lenient(gender),
        date_of_birth: parse_date("date_of_birth", date_of_birth)?,
        height_cm,
        weight_kg,
        activity_level: ActivityLevel::parse_lenient(activity_level),
        goal: Goal::parse_lenient(goal),
    };
    let derived = shared::derive_metrics(&inputs, parse_date("today", today)?);
    serde_json::to_string(&derived).map_err(|e| e.to_string())
}

/// Full derived metric set as JSON, exactly as the server stores it
#[wasm_bindgen]
pub fn derive_metrics_json(
    gender: &str,
    date_of_birth: &str,
    height_cm: f64,
    weight_kg: f64,
    activity_level: &str,
    goal: &str,
    today: &str,
) -> Result<String, JsError> {
    derive_metrics_inner(
        gender,
        date_of_birth,
        height_cm,
        weight_kg,
        activity_level,
        goal,
        today,
    )
    .map_err(|e| JsError::new(&e))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn derive_metrics_json_in_browser() {
        let Ok(json) = derive_metrics_json(
            "MALE",
            "1994-03-10",
            175.0,
            70.0,
            "MODERATELY_ACTIVE",
            "LOSE_WEIGHT",
            "2024-03-10",
        ) else {
            panic!("valid inputs must derive");
        };
        assert!(json.contains("\"bmr\":1648.75"));
    }

    #[wasm_bindgen_test]
    fn invalid_date_raises() {
        let result =
            derive_metrics_json("MALE", "x", 175.0, 70.0, "SEDENTARY", "MAINTAIN", "2024-03-10");
        assert!(result.is_err());
    }
}
