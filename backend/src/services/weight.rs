//! Weight tracking service
//!
//! Logs body weight, keeps the profile's current weight in step with the
//! newest entry, and summarises progress over a window.

use super::log_entries::{delete_owned, record_created};
use super::ProfileService;
use crate::error::ApiError;
use crate::repositories::{LogStore, SortOrder};
use chrono::{DateTime, Utc};
use health_monitor_shared::validation::validate_weight;
use health_monitor_shared::{calculate_bmi, DateRange, WeightLogEntry, WeightProgress};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const KIND: &str = "weight";

/// Weight service for business logic
#[derive(Clone)]
pub struct WeightService {
    weights: Arc<dyn LogStore<WeightLogEntry>>,
    profiles: ProfileService,
}

impl WeightService {
    pub fn new(weights: Arc<dyn LogStore<WeightLogEntry>>, profiles: ProfileService) -> Self {
        Self { weights, profiles }
    }

    /// Log a weight entry and make it the profile's current weight
    pub async fn log_weight(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<WeightLogEntry, ApiError> {
        validate_weight(weight_kg)?;
        let profile = self.profiles.get_profile(user_id).await?;

        let entry = WeightLogEntry {
            id: Uuid::new_v4(),
            user_id,
            weight_kg,
            bmi: calculate_bmi(weight_kg, profile.height_cm),
            note,
            logged_at: now,
        };
        let entry = self.weights.insert(entry).await.map_err(ApiError::Internal)?;

        self.profiles.update_weight(user_id, weight_kg, now).await?;

        record_created(KIND);
        info!(%user_id, weight_kg, bmi = entry.bmi, "Weight logged");

        Ok(entry)
    }

    /// Net change and mean BMI over the entries in `range`
    pub async fn progress(&self, user_id: Uuid, range: DateRange) -> Result<WeightProgress, ApiError> {
        debug!(%user_id, from = %range.start, to = %range.end, "Computing weight progress");

        let entries = self
            .weights
            .find_by_user_and_range(
                user_id,
                range.start_instant(),
                range.end_instant(),
                SortOrder::Ascending,
            )
            .await
            .map_err(ApiError::Internal)?;

        Ok(Self::summarize(range, entries))
    }

    fn summarize(range: DateRange, entries: Vec<WeightLogEntry>) -> WeightProgress {
        let start_weight = entries.first().map(|e| e.weight_kg);
        let current_weight = entries.last().map(|e| e.weight_kg);

        let weight_change = match (start_weight, current_weight) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        };
        let average_bmi = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(|e| e.bmi).sum::<f64>() / entries.len() as f64
        };

        WeightProgress {
            from: range.start,
            to: range.end,
            entries,
            weight_change,
            average_bmi,
            start_weight,
            current_weight,
        }
    }

    /// Delete an entry; the profile weight follows the newest remaining entry
    pub async fn delete_log(
        &self,
        user_id: Uuid,
        log_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        delete_owned(self.weights.as_ref(), KIND, user_id, log_id).await?;

        let latest = self
            .weights
            .find_latest_by_user(user_id)
            .await
            .map_err(ApiError::Internal)?;

        if let Some(latest) = latest {
            self.profiles
                .update_weight(user_id, latest.weight_kg, now)
                .await?;
        }

        Ok(())
    }

    /// All entries, newest first
    pub async fn history(&self, user_id: Uuid) -> Result<Vec<WeightLogEntry>, ApiError> {
        self.weights
            .find_by_user(user_id, SortOrder::Descending)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn latest(&self, user_id: Uuid) -> Result<WeightLogEntry, ApiError> {
        self.weights
            .find_latest_by_user(user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound(format!("No weight logged for user {user_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryLogStore, InMemoryProfileStore};
    use chrono::{Duration, NaiveDate, TimeZone};
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use health_monitor_shared::{ActivityLevel, Gender, Goal, SaveProfileRequest};
    use proptest::prelude::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn at(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, d, h, 0, 0).unwrap()
    }

    async fn setup() -> (WeightService, ProfileService, Uuid) {
        let profiles = ProfileService::new(Arc::new(InMemoryProfileStore::new()));
        let service = WeightService::new(Arc::new(InMemoryLogStore::new()), profiles.clone());
        let user = Uuid::new_v4();

        profiles
            .save(
                user,
                SaveProfileRequest {
                    gender: Gender::Female,
                    date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                    height_cm: 160.0,
                    current_weight_kg: 64.0,
                    target_weight_kg: None,
                    activity_level: ActivityLevel::Sedentary,
                    goal: Goal::Maintain,
                },
                at(1, 8),
            )
            .await
            .unwrap();

        (service, profiles, user)
    }

    #[tokio::test]
    async fn test_log_weight_updates_profile() {
        let (service, profiles, user) = setup().await;
        let note: String = Sentence(3..8).fake();

        let entry = service
            .log_weight(user, 62.0, Some(note.clone()), at(2, 7))
            .await
            .unwrap();

        assert!((entry.bmi - 62.0 / 2.56).abs() < 1e-9);
        assert_eq!(entry.note, Some(note));

        let profile = profiles.get_profile(user).await.unwrap();
        assert_eq!(profile.current_weight_kg, 62.0);
        assert_eq!(profile.daily_water_goal_ml, (62.0 * 33.0) as i32);
    }

    #[tokio::test]
    async fn test_log_weight_without_profile() {
        let (service, _, _) = setup().await;
        let result = service.log_weight(Uuid::new_v4(), 70.0, None, at(2, 7)).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_non_positive_weight_rejected_before_write() {
        let (service, _, user) = setup().await;
        let result = service.log_weight(user, -1.0, None, at(2, 7)).await;

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert!(service.history(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_progress_over_window() {
        let (service, _, user) = setup().await;
        service.log_weight(user, 64.0, None, at(2, 7)).await.unwrap();
        service.log_weight(user, 63.0, None, at(5, 7)).await.unwrap();
        service.log_weight(user, 62.5, None, at(9, 7)).await.unwrap();

        let range = DateRange::new(day(1), day(7)).unwrap();
        let progress = service.progress(user, range).await.unwrap();

        assert_eq!(progress.entries.len(), 2);
        assert_eq!(progress.weight_change, -1.0);
        assert_eq!(progress.start_weight, Some(64.0));
        assert_eq!(progress.current_weight, Some(63.0));
        let expected_bmi = (64.0 / 2.56 + 63.0 / 2.56) / 2.0;
        assert!((progress.average_bmi - expected_bmi).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_empty_progress() {
        let (service, _, user) = setup().await;
        let progress = service
            .progress(user, DateRange::single_day(day(20)))
            .await
            .unwrap();

        assert!(progress.entries.is_empty());
        assert_eq!(progress.weight_change, 0.0);
        assert_eq!(progress.average_bmi, 0.0);
        assert_eq!(progress.start_weight, None);
    }

    #[tokio::test]
    async fn test_delete_rederives_from_newest_remaining() {
        let (service, profiles, user) = setup().await;
        service.log_weight(user, 64.0, None, at(2, 7)).await.unwrap();
        let newest = service.log_weight(user, 61.0, None, at(3, 7)).await.unwrap();

        service.delete_log(user, newest.id, at(3, 9)).await.unwrap();

        let profile = profiles.get_profile(user).await.unwrap();
        assert_eq!(profile.current_weight_kg, 64.0);
        assert_eq!(service.latest(user).await.unwrap().weight_kg, 64.0);
    }

    #[tokio::test]
    async fn test_delete_last_entry_leaves_profile() {
        let (service, profiles, user) = setup().await;
        let only = service.log_weight(user, 61.0, None, at(2, 7)).await.unwrap();

        service.delete_log(user, only.id, at(2, 9)).await.unwrap();

        assert_eq!(profiles.get_profile(user).await.unwrap().current_weight_kg, 61.0);
        assert!(matches!(service.latest(user).await, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_someone_elses_entry() {
        let (service, _, user) = setup().await;
        let entry = service.log_weight(user, 61.0, None, at(2, 7)).await.unwrap();

        let result = service.delete_log(Uuid::new_v4(), entry.id, at(2, 9)).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
        assert_eq!(service.history(user).await.unwrap().len(), 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Change is always last minus first, whatever lies between
        #[test]
        fn prop_weight_change_is_last_minus_first(
            weights in prop::collection::vec(30.0f64..200.0, 1..20)
        ) {
            let entries: Vec<WeightLogEntry> = weights
                .iter()
                .enumerate()
                .map(|(i, w)| WeightLogEntry {
                    id: Uuid::new_v4(),
                    user_id: Uuid::nil(),
                    weight_kg: *w,
                    bmi: *w / 3.0,
                    note: None,
                    logged_at: at(1, 0) + Duration::minutes(i as i64),
                })
                .collect();

            let progress = WeightService::summarize(DateRange::single_day(day(1)), entries);
            let expected = weights[weights.len() - 1] - weights[0];
            prop_assert_eq!(progress.weight_change, expected);
        }
    }
}
