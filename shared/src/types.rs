//! API request and response types

use crate::errors::{HealthError, HealthResult};
use crate::health_metrics::{ActivityLevel, Gender, Goal};
use crate::models::{User, WeightLogEntry};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Date Ranges
// ============================================================================

/// Inclusive calendar date range, in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start > end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> HealthResult<Self> {
        if start > end {
            return Err(HealthError::invalid(format!(
                "range start {start} is after range end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self { start: day, end: day }
    }

    /// The seven days ending on `today`, inclusive
    pub fn last_seven_days(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(6),
            end: today,
        }
    }

    /// Whole calendar month
    pub fn month(year: i32, month: u32) -> HealthResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| HealthError::invalid(format!("invalid month {year}-{month}")))?;
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|first| first.pred_opt())
            .ok_or_else(|| HealthError::invalid(format!("invalid month {year}-{month}")))?;
        Ok(Self { start, end })
    }

    /// Number of calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// First instant of the range: `start` at midnight
    pub fn start_instant(&self) -> DateTime<Utc> {
        self.start.and_time(NaiveTime::MIN).and_utc()
    }

    /// Last instant of the range: one nanosecond before midnight after `end`
    pub fn end_instant(&self) -> DateTime<Utc> {
        match self.end.succ_opt() {
            Some(next) => next.and_time(NaiveTime::MIN).and_utc() - Duration::nanoseconds(1),
            None => DateTime::<Utc>::MAX_UTC,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start_instant() && at <= self.end_instant()
    }

    /// Each calendar day in the range, ascending
    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.days() as usize)
    }
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl RangeQuery {
    pub fn range(&self) -> HealthResult<DateRange> {
        DateRange::new(self.from, self.to)
    }
}

/// `?year=&month=`, both optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

impl MonthQuery {
    /// Resolve against `today`, defaulting missing parts to the current month
    pub fn resolve(&self, today: NaiveDate) -> (i32, u32) {
        (
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or_else(|| today.month()),
        )
    }
}

// ============================================================================
// Errors
// ============================================================================

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

// ============================================================================
// Auth Types
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Access token issued on register and login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// The caller's account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserAccount {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Profile Types
// ============================================================================

fn known_activity_level(level: &ActivityLevel) -> Result<(), validator::ValidationError> {
    match level {
        ActivityLevel::Unrecognized => Err(validator::ValidationError::new("unknown_activity_level")),
        _ => Ok(()),
    }
}

fn known_goal(goal: &Goal) -> Result<(), validator::ValidationError> {
    match goal {
        Goal::Unrecognized => Err(validator::ValidationError::new("unknown_goal")),
        _ => Ok(()),
    }
}

/// Create or replace the caller's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SaveProfileRequest {
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    #[validate(range(min = 50.0, max = 300.0))]
    pub height_cm: f64,
    #[validate(range(min = 20.0, max = 500.0))]
    pub current_weight_kg: f64,
    #[validate(range(min = 20.0, max = 500.0))]
    pub target_weight_kg: Option<f64>,
    #[validate(custom(function = "known_activity_level"))]
    pub activity_level: ActivityLevel,
    #[validate(custom(function = "known_goal"))]
    pub goal: Goal,
}

/// Change only the current weight
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateWeightRequest {
    #[validate(range(min = 20.0, max = 500.0))]
    pub weight_kg: f64,
}

// ============================================================================
// Weight Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogWeightRequest {
    #[validate(range(min = 20.0, max = 500.0))]
    pub weight_kg: f64,
    #[validate(length(max = 500))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Weight change and mean BMI over a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightProgress {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Ascending by `logged_at`
    pub entries: Vec<WeightLogEntry>,
    pub weight_change: f64,
    pub average_bmi: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
}

// ============================================================================
// Hydration Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogWaterRequest {
    #[validate(range(min = 1, max = 10000))]
    pub amount_ml: i32,
}

/// Today's water total against the goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayWater {
    pub date: NaiveDate,
    pub total_ml: i64,
    pub goal_ml: i32,
    pub percentage: f64,
    pub goal_reached: bool,
}

/// Water statistics over a range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaterStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_ml: i64,
    pub average_per_day: i64,
    pub logs_count: i64,
    pub days_count: i64,
}

// ============================================================================
// Nutrition & Activity Types
// ============================================================================

/// How a meal names its food
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodRef {
    Id(Uuid),
    Name(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogMealRequest {
    #[serde(default)]
    pub food_id: Option<Uuid>,
    #[validate(length(min = 1, max = 200))]
    #[serde(default)]
    pub food_name: Option<String>,
    #[validate(range(max = 100.0))]
    pub servings: f64,
}

impl LogMealRequest {
    /// The food id wins when both are given
    pub fn food_ref(&self) -> HealthResult<FoodRef> {
        match (self.food_id, self.food_name.as_deref()) {
            (Some(id), _) => Ok(FoodRef::Id(id)),
            (None, Some(name)) if !name.trim().is_empty() => Ok(FoodRef::Name(name.to_string())),
            _ => Err(HealthError::invalid("either food_id or food_name is required")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodSearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LogActivityRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0.1, max = 30.0))]
    pub met: f64,
    #[validate(range(min = 1, max = 1440))]
    pub minutes: i32,
    /// Defaults to the profile's current weight
    #[validate(range(min = 20.0, max = 500.0))]
    #[serde(default)]
    pub weight_kg: Option<f64>,
}

/// Sum of a kcal log for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodayKcal {
    pub date: NaiveDate,
    pub total_kcal: i64,
}

// ============================================================================
// Statistics Types
// ============================================================================

/// Totals and truncated per-day averages over an arbitrary range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_water_ml: i64,
    pub total_calories_in: i64,
    pub total_calories_out: i64,
    pub net_calories: i64,
    pub avg_water_per_day: i64,
    pub avg_calories_in_per_day: i64,
    pub avg_calories_out_per_day: i64,
    pub days_count: i64,
}

/// One calendar day of totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub water_ml: i64,
    pub calories_in: i64,
    pub calories_out: i64,
    pub net_calories: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStats {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub total_water_ml: i64,
    pub total_calories_in: i64,
    pub total_calories_out: i64,
    pub net_calories: i64,
    pub avg_water_per_day: i64,
    pub avg_calories_in_per_day: i64,
    pub avg_calories_out_per_day: i64,
    pub daily_breakdown: Vec<DailyStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub month_start: NaiveDate,
    pub month_end: NaiveDate,
    pub days_in_month: i64,
    pub total_water_ml: i64,
    pub total_calories_in: i64,
    pub total_calories_out: i64,
    pub net_calories: i64,
    pub avg_water_per_day: i64,
    pub avg_calories_in_per_day: i64,
    pub avg_calories_out_per_day: i64,
}

// ============================================================================
// Dashboard Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterProgress {
    pub current: i64,
    pub goal: i32,
    pub percentage: f64,
    /// Never negative
    pub remaining: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieProgress {
    pub intake: i64,
    pub burned: i64,
    pub net: i64,
    pub goal: i32,
    /// Negative once intake exceeds the goal
    pub remaining: i64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayDashboard {
    pub date: NaiveDate,
    pub water: WaterProgress,
    pub calories: CalorieProgress,
    pub has_profile: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekOverview {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub total_water_ml: i64,
    pub total_calories_in: i64,
    pub total_calories_out: i64,
    pub avg_water_per_day: i64,
    pub avg_calories_in_per_day: i64,
    pub avg_calories_out_per_day: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_rejects_inverted_bounds() {
        assert!(DateRange::new(date(2024, 1, 2), date(2024, 1, 1)).is_err());
        assert!(DateRange::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
    }

    #[test]
    fn test_range_instants_cover_whole_days() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        assert_eq!(range.days(), 3);
        assert_eq!(range.start_instant().to_rfc3339(), "2024-01-01T00:00:00+00:00");

        let end = range.end_instant();
        assert_eq!(end.date_naive(), date(2024, 1, 3));
        assert_eq!(end + Duration::nanoseconds(1), date(2024, 1, 4).and_time(NaiveTime::MIN).and_utc());

        assert!(range.contains(end));
        assert!(!range.contains(end + Duration::nanoseconds(1)));
    }

    #[test]
    fn test_last_seven_days() {
        let range = DateRange::last_seven_days(date(2024, 3, 3));
        assert_eq!(range.start, date(2024, 2, 26));
        assert_eq!(range.days(), 7);
        assert_eq!(range.iter_days().count(), 7);
    }

    #[rstest]
    #[case(2024, 2, 29)]
    #[case(2023, 2, 28)]
    #[case(2024, 4, 30)]
    #[case(2024, 12, 31)]
    fn test_month_lengths(#[case] year: i32, #[case] month: u32, #[case] days: i64) {
        let range = DateRange::month(year, month).unwrap();
        assert_eq!(range.days(), days);
        assert_eq!(range.start, date(year, month, 1));
    }

    #[test]
    fn test_invalid_month() {
        assert!(DateRange::month(2024, 13).is_err());
        assert!(DateRange::month(2024, 0).is_err());
    }

    #[test]
    fn test_month_query_defaults_to_today() {
        let today = date(2024, 5, 17);
        assert_eq!(MonthQuery::default().resolve(today), (2024, 5));
        let query = MonthQuery { year: None, month: Some(2) };
        assert_eq!(query.resolve(today), (2024, 2));
    }

    #[test]
    fn test_food_ref_prefers_id() {
        let id = Uuid::new_v4();
        let req = LogMealRequest {
            food_id: Some(id),
            food_name: Some("Apple".into()),
            servings: 1.0,
        };
        assert_eq!(req.food_ref().unwrap(), FoodRef::Id(id));

        let by_name = LogMealRequest {
            food_id: None,
            food_name: Some("Apple".into()),
            servings: 1.0,
        };
        assert_eq!(by_name.food_ref().unwrap(), FoodRef::Name("Apple".into()));

        let neither = LogMealRequest {
            food_id: None,
            food_name: Some("  ".into()),
            servings: 1.0,
        };
        assert!(neither.food_ref().is_err());
    }

    #[test]
    fn test_profile_request_rejects_unknown_enums() {
        let json = serde_json::json!({
            "gender": "FEMALE",
            "date_of_birth": "1990-01-01",
            "height_cm": 165.0,
            "current_weight_kg": 60.0,
            "activity_level": "HYPER_ACTIVE",
            "goal": "MAINTAIN"
        });
        let req: SaveProfileRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_profile_request_valid() {
        let json = serde_json::json!({
            "gender": "OTHER",
            "date_of_birth": "1990-01-01",
            "height_cm": 165.0,
            "current_weight_kg": 60.0,
            "target_weight_kg": 55.0,
            "activity_level": "SEDENTARY",
            "goal": "LOSE_WEIGHT"
        });
        let req: SaveProfileRequest = serde_json::from_value(json).unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.gender, Gender::Other);
    }

    #[rstest]
    #[case("ada@example.com", "correct horse", "Ada", true)]
    #[case("not-an-email", "correct horse", "Ada", false)]
    #[case("ada@example.com", "short", "Ada", false)]
    #[case("ada@example.com", "correct horse", "", false)]
    fn test_register_request_validation(
        #[case] email: &str,
        #[case] password: &str,
        #[case] full_name: &str,
        #[case] valid: bool,
    ) {
        let req = RegisterRequest {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
        };
        assert_eq!(req.validate().is_ok(), valid);
    }
}
