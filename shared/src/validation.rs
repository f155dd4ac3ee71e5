//! Input validation functions
//!
//! Request bodies are checked with the `validator` derive at the HTTP edge;
//! these functions guard the service layer so that every write is validated
//! before anything is mutated, whichever way it is called.

use crate::errors::{HealthError, HealthResult};
use crate::health_metrics::{ActivityLevel, Goal};
use chrono::NaiveDate;

fn finite(name: &str, value: f64) -> HealthResult<f64> {
    if value.is_nan() || value.is_infinite() {
        return Err(HealthError::invalid(format!("{name} must be a valid number")));
    }
    Ok(value)
}

/// Any strictly positive, finite number
pub fn validate_positive(name: &str, value: f64) -> HealthResult<()> {
    if finite(name, value)? <= 0.0 {
        return Err(HealthError::invalid(format!("{name} must be positive")));
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> HealthResult<()> {
    validate_positive("Weight", weight_kg)
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> HealthResult<()> {
    let height_cm = finite("Height", height_cm)?;
    if height_cm < 50.0 {
        return Err(HealthError::invalid("Height must be at least 50 cm"));
    }
    if height_cm > 300.0 {
        return Err(HealthError::invalid("Height must be at most 300 cm"));
    }
    Ok(())
}

/// Validate date of birth against the caller's `today`
pub fn validate_date_of_birth(dob: NaiveDate, today: NaiveDate) -> HealthResult<()> {
    if dob > today {
        return Err(HealthError::invalid("Date of birth cannot be in the future"));
    }
    match today.years_since(dob) {
        Some(age) if age > 150 => Err(HealthError::invalid("Age cannot exceed 150 years")),
        Some(_) => Ok(()),
        None => Err(HealthError::invalid("Invalid date of birth")),
    }
}

pub fn validate_activity_level(level: ActivityLevel) -> HealthResult<()> {
    match level {
        ActivityLevel::Unrecognized => Err(HealthError::invalid(format!(
            "Invalid activity level. Must be one of: {}",
            ActivityLevel::ALL
                .iter()
                .map(|l| l.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
        _ => Ok(()),
    }
}

pub fn validate_goal(goal: Goal) -> HealthResult<()> {
    match goal {
        Goal::Unrecognized => Err(HealthError::invalid(
            "Invalid goal. Must be one of: LOSE_WEIGHT, MAINTAIN, GAIN_WEIGHT",
        )),
        _ => Ok(()),
    }
}
