//! Exercise service - activity logging with MET-based calorie burn

use super::log_entries::{delete_owned, record_created};
use crate::error::ApiError;
use crate::repositories::{ProfileStore, SortOrder, SummableLogStore};
use chrono::{DateTime, NaiveDate, Utc};
use health_monitor_shared::validation::{validate_positive, validate_weight};
use health_monitor_shared::{activity_kcal, ActivityLog, DateRange, HealthError, TodayKcal};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const KIND: &str = "activity";

#[derive(Clone)]
pub struct ExerciseService {
    activities: Arc<dyn SummableLogStore<ActivityLog>>,
    profiles: Arc<dyn ProfileStore>,
}

impl ExerciseService {
    pub fn new(
        activities: Arc<dyn SummableLogStore<ActivityLog>>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self { activities, profiles }
    }

    /// Log an activity
    ///
    /// The burn is computed with `weight_override` when given, otherwise with
    /// the profile's current weight, and is stored alongside the weight used.
    pub async fn log_activity(
        &self,
        user_id: Uuid,
        name: String,
        met: f64,
        minutes: i32,
        weight_override: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<ActivityLog, ApiError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(HealthError::invalid("activity name is required").into());
        }
        validate_positive("met", met)?;
        if minutes <= 0 {
            return Err(HealthError::invalid("minutes must be positive").into());
        }

        let weight_kg = match weight_override {
            Some(weight) => {
                validate_weight(weight)?;
                weight
            }
            None => self
                .profiles
                .find_by_user(user_id)
                .await
                .map_err(ApiError::Internal)?
                .map(|p| p.current_weight_kg)
                .ok_or_else(|| {
                    ApiError::NotFound(format!(
                        "No profile for user {user_id}; pass weight_kg explicitly"
                    ))
                })?,
        };

        let entry = self
            .activities
            .insert(ActivityLog {
                id: Uuid::new_v4(),
                user_id,
                total_kcal: activity_kcal(met, weight_kg, minutes),
                name,
                met,
                minutes,
                weight_kg_at_time: weight_kg,
                logged_at: now,
            })
            .await
            .map_err(ApiError::Internal)?;

        record_created(KIND);
        info!(
            %user_id,
            activity = %entry.name,
            minutes,
            total_kcal = entry.total_kcal,
            "Activity logged"
        );

        Ok(entry)
    }

    pub async fn today_total(&self, user_id: Uuid, today: NaiveDate) -> Result<TodayKcal, ApiError> {
        let range = DateRange::single_day(today);
        let total_kcal = self
            .activities
            .sum_by_user_and_range(user_id, range.start_instant(), range.end_instant())
            .await
            .map_err(ApiError::Internal)?;

        Ok(TodayKcal { date: today, total_kcal })
    }

    pub async fn history(&self, user_id: Uuid, range: DateRange) -> Result<Vec<ActivityLog>, ApiError> {
        self.activities
            .find_by_user_and_range(
                user_id,
                range.start_instant(),
                range.end_instant(),
                SortOrder::Descending,
            )
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn delete(&self, user_id: Uuid, log_id: Uuid) -> Result<(), ApiError> {
        delete_owned(self.activities.as_ref(), KIND, user_id, log_id).await?;
        Ok(())
    }
}
