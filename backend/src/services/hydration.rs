//! Hydration service

use super::log_entries::{delete_owned, record_created};
use crate::error::ApiError;
use crate::repositories::{ProfileStore, SortOrder, SummableLogStore};
use chrono::{DateTime, NaiveDate, Utc};
use health_monitor_shared::{
    percent_of_goal, DateRange, HealthError, WaterLog, WaterStats, TodayWater, DEFAULT_DAILY_GOAL,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const KIND: &str = "water";

#[derive(Clone)]
pub struct HydrationService {
    water: Arc<dyn SummableLogStore<WaterLog>>,
    profiles: Arc<dyn ProfileStore>,
}

impl HydrationService {
    pub fn new(water: Arc<dyn SummableLogStore<WaterLog>>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { water, profiles }
    }

    pub async fn log_water(
        &self,
        user_id: Uuid,
        amount_ml: i32,
        now: DateTime<Utc>,
    ) -> Result<WaterLog, ApiError> {
        if amount_ml <= 0 {
            return Err(HealthError::invalid("amount_ml must be positive").into());
        }

        let entry = self
            .water
            .insert(WaterLog {
                id: Uuid::new_v4(),
                user_id,
                amount_ml,
                logged_at: now,
            })
            .await
            .map_err(ApiError::Internal)?;

        record_created(KIND);
        info!(%user_id, amount_ml, "Water logged");

        Ok(entry)
    }

    /// Today's intake against the profile goal, or the default goal
    pub async fn today_total(&self, user_id: Uuid, today: NaiveDate) -> Result<TodayWater, ApiError> {
        let range = DateRange::single_day(today);
        let total_ml = self.sum(user_id, &range).await?;

        let goal_ml = self
            .profiles
            .find_by_user(user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(|p| p.daily_water_goal_ml)
            .unwrap_or(DEFAULT_DAILY_GOAL);

        Ok(TodayWater {
            date: today,
            total_ml,
            goal_ml,
            percentage: percent_of_goal(total_ml as f64, goal_ml as f64)?,
            goal_reached: total_ml >= i64::from(goal_ml),
        })
    }

    /// Entries in range, newest first
    pub async fn history(&self, user_id: Uuid, range: DateRange) -> Result<Vec<WaterLog>, ApiError> {
        self.water
            .find_by_user_and_range(
                user_id,
                range.start_instant(),
                range.end_instant(),
                SortOrder::Descending,
            )
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn stats(&self, user_id: Uuid, range: DateRange) -> Result<WaterStats, ApiError> {
        debug!(%user_id, from = %range.start, to = %range.end, "Computing water stats");

        let total_ml = self.sum(user_id, &range).await?;
        let logs_count = self.history(user_id, range).await?.len() as i64;
        let days_count = range.days();

        Ok(WaterStats {
            from: range.start,
            to: range.end,
            total_ml,
            average_per_day: total_ml / days_count,
            logs_count,
            days_count,
        })
    }

    pub async fn delete(&self, user_id: Uuid, log_id: Uuid) -> Result<(), ApiError> {
        delete_owned(self.water.as_ref(), KIND, user_id, log_id).await?;
        Ok(())
    }

    async fn sum(&self, user_id: Uuid, range: &DateRange) -> Result<i64, ApiError> {
        self.water
            .sum_by_user_and_range(user_id, range.start_instant(), range.end_instant())
            .await
            .map_err(ApiError::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryLogStore, InMemoryProfileStore};
    use crate::services::ProfileService;
    use chrono::{Duration, TimeZone};
    use health_monitor_shared::{ActivityLevel, Gender, Goal, SaveProfileRequest};

    struct Fixture {
        service: HydrationService,
        profiles: ProfileService,
        user: Uuid,
    }

    fn fixture() -> Fixture {
        let profile_store = Arc::new(InMemoryProfileStore::new());
        Fixture {
            service: HydrationService::new(Arc::new(InMemoryLogStore::new()), profile_store.clone()),
            profiles: ProfileService::new(profile_store),
            user: Uuid::new_v4(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 12).unwrap()
    }

    fn at_hour(h: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 0, 0, 0).unwrap() + Duration::hours(h)
    }

    #[tokio::test]
    async fn test_today_total_without_profile_uses_default_goal() {
        let f = fixture();
        f.service.log_water(f.user, 500, at_hour(8)).await.unwrap();
        f.service.log_water(f.user, 250, at_hour(13)).await.unwrap();
        // yesterday and tomorrow are excluded
        f.service.log_water(f.user, 900, at_hour(-1)).await.unwrap();
        f.service.log_water(f.user, 900, at_hour(24)).await.unwrap();

        let total = f.service.today_total(f.user, today()).await.unwrap();

        assert_eq!(total.total_ml, 750);
        assert_eq!(total.goal_ml, DEFAULT_DAILY_GOAL);
        assert_eq!(total.percentage, 37.5);
        assert!(!total.goal_reached);
    }

    #[tokio::test]
    async fn test_today_total_uses_profile_goal_and_clamps() {
        let f = fixture();
        f.profiles
            .save(
                f.user,
                SaveProfileRequest {
                    gender: Gender::Male,
                    date_of_birth: NaiveDate::from_ymd_opt(1985, 2, 2).unwrap(),
                    height_cm: 180.0,
                    current_weight_kg: 60.0,
                    target_weight_kg: None,
                    activity_level: ActivityLevel::Sedentary,
                    goal: Goal::Maintain,
                },
                at_hour(6),
            )
            .await
            .unwrap();
        f.service.log_water(f.user, 2500, at_hour(9)).await.unwrap();

        let total = f.service.today_total(f.user, today()).await.unwrap();

        assert_eq!(total.goal_ml, 1980);
        assert_eq!(total.percentage, 100.0);
        assert!(total.goal_reached);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected() {
        let f = fixture();
        for amount in [0, -250] {
            let result = f.service.log_water(f.user, amount, at_hour(8)).await;
            assert!(matches!(result, Err(ApiError::Validation { .. })));
        }
        let range = DateRange::single_day(today());
        assert!(f.service.history(f.user, range).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stats_average_truncates() {
        let f = fixture();
        f.service.log_water(f.user, 1000, at_hour(-30)).await.unwrap();
        f.service.log_water(f.user, 1001, at_hour(2)).await.unwrap();
        f.service.log_water(f.user, 300, at_hour(-80)).await.unwrap();

        let range = DateRange::new(today() - Duration::days(2), today()).unwrap();
        let stats = f.service.stats(f.user, range).await.unwrap();

        assert_eq!(stats.total_ml, 2001);
        assert_eq!(stats.days_count, 3);
        assert_eq!(stats.average_per_day, 667);
        assert_eq!(stats.logs_count, 2);
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_scoped_to_user() {
        let f = fixture();
        f.service.log_water(f.user, 100, at_hour(7)).await.unwrap();
        f.service.log_water(f.user, 200, at_hour(9)).await.unwrap();
        f.service.log_water(Uuid::new_v4(), 300, at_hour(8)).await.unwrap();

        let history = f
            .service
            .history(f.user, DateRange::single_day(today()))
            .await
            .unwrap();

        let amounts: Vec<i32> = history.iter().map(|l| l.amount_ml).collect();
        assert_eq!(amounts, vec![200, 100]);
    }

    #[tokio::test]
    async fn test_delete_checks_owner() {
        let f = fixture();
        let entry = f.service.log_water(f.user, 100, at_hour(7)).await.unwrap();

        let stranger = f.service.delete(Uuid::new_v4(), entry.id).await;
        assert!(matches!(stranger, Err(ApiError::Forbidden(_))));

        f.service.delete(f.user, entry.id).await.unwrap();
        let again = f.service.delete(f.user, entry.id).await;
        assert!(matches!(again, Err(ApiError::NotFound(_))));
    }
}
