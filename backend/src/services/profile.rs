//! Profile service - derives and stores the full metric set on every save

use crate::error::ApiError;
use crate::repositories::ProfileStore;
use chrono::{DateTime, Utc};
use health_monitor_shared::validation::{
    validate_activity_level, validate_date_of_birth, validate_goal, validate_height_cm,
    validate_weight,
};
use health_monitor_shared::{derive_metrics, health_insights, HealthInsights, Profile, SaveProfileRequest};
use metrics::counter;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

fn profile_not_found(user_id: Uuid) -> ApiError {
    ApiError::NotFound(format!("No profile for user {user_id}"))
}

/// Profile service for user profile operations
#[derive(Clone)]
pub struct ProfileService {
    profiles: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileStore>) -> Self {
        Self { profiles }
    }

    fn validate_input(input: &SaveProfileRequest, now: DateTime<Utc>) -> Result<(), ApiError> {
        validate_height_cm(input.height_cm)?;
        validate_weight(input.current_weight_kg)?;
        if let Some(target) = input.target_weight_kg {
            validate_weight(target)?;
        }
        validate_date_of_birth(input.date_of_birth, now.date_naive())?;
        validate_activity_level(input.activity_level)?;
        validate_goal(input.goal)?;
        Ok(())
    }

    /// Create or replace the user's profile
    ///
    /// An existing profile keeps its `id` and `created_at`. Every derived
    /// field is recomputed from `input` and persisted with one store write.
    pub async fn save(
        &self,
        user_id: Uuid,
        input: SaveProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<Profile, ApiError> {
        Self::validate_input(&input, now)?;

        let existing = self.find(user_id).await?;
        self.persist(user_id, existing, input, now).await
    }

    /// Change only the current weight, then re-derive everything
    pub async fn update_weight(
        &self,
        user_id: Uuid,
        weight_kg: f64,
        now: DateTime<Utc>,
    ) -> Result<Profile, ApiError> {
        validate_weight(weight_kg)?;

        let existing = self
            .find(user_id)
            .await?
            .ok_or_else(|| profile_not_found(user_id))?;

        let input = SaveProfileRequest {
            gender: existing.gender,
            date_of_birth: existing.date_of_birth,
            height_cm: existing.height_cm,
            current_weight_kg: weight_kg,
            target_weight_kg: existing.target_weight_kg,
            activity_level: existing.activity_level,
            goal: existing.goal,
        };

        self.persist(user_id, Some(existing), input, now).await
    }

    async fn persist(
        &self,
        user_id: Uuid,
        existing: Option<Profile>,
        input: SaveProfileRequest,
        now: DateTime<Utc>,
    ) -> Result<Profile, ApiError> {
        let (id, created_at) = existing
            .map(|p| (p.id, p.created_at))
            .unwrap_or_else(|| (Uuid::new_v4(), now));

        let mut profile = Profile {
            id,
            user_id,
            gender: input.gender,
            date_of_birth: input.date_of_birth,
            height_cm: input.height_cm,
            current_weight_kg: input.current_weight_kg,
            target_weight_kg: input.target_weight_kg,
            activity_level: input.activity_level,
            goal: input.goal,
            bmi: 0.0,
            bmr: 0.0,
            tdee: 0.0,
            daily_calorie_goal: 0,
            daily_water_goal_ml: 0,
            created_at,
            updated_at: now,
        };
        let derived = derive_metrics(&profile.metric_inputs(), now.date_naive());
        // Dashboard percentages divide by this goal
        if derived.daily_calorie_goal <= 0 {
            return Err(ApiError::validation(format!(
                "These inputs give a daily calorie goal of {} kcal; it must be positive",
                derived.daily_calorie_goal
            )));
        }
        profile.apply_derived(&derived);

        let saved = self.profiles.save(profile).await.map_err(ApiError::Internal)?;

        counter!("health_monitor_profile_saves_total").increment(1);
        info!(
            %user_id,
            bmi = saved.bmi,
            daily_calorie_goal = saved.daily_calorie_goal,
            "Profile saved"
        );

        Ok(saved)
    }

    pub async fn find(&self, user_id: Uuid) -> Result<Option<Profile>, ApiError> {
        self.profiles
            .find_by_user(user_id)
            .await
            .map_err(ApiError::Internal)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<Profile, ApiError> {
        self.find(user_id)
            .await?
            .ok_or_else(|| profile_not_found(user_id))
    }

    pub async fn exists(&self, user_id: Uuid) -> Result<bool, ApiError> {
        self.profiles.exists(user_id).await.map_err(ApiError::Internal)
    }

    /// Insights from the stored derived fields
    pub async fn get_insights(&self, user_id: Uuid) -> Result<HealthInsights, ApiError> {
        let profile = self.get_profile(user_id).await?;

        Ok(health_insights(
            &profile.derived_metrics(),
            profile.height_cm,
            profile.current_weight_kg,
            profile.target_weight_kg,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryProfileStore;
    use chrono::{Duration, NaiveDate, TimeZone};
    use health_monitor_shared::{ActivityLevel, Gender, Goal};

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(InMemoryProfileStore::new()))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
    }

    fn input() -> SaveProfileRequest {
        SaveProfileRequest {
            gender: Gender::Male,
            date_of_birth: NaiveDate::from_ymd_opt(1994, 3, 10).unwrap(),
            height_cm: 175.0,
            current_weight_kg: 70.0,
            target_weight_kg: Some(65.0),
            activity_level: ActivityLevel::ModeratelyActive,
            goal: Goal::LoseWeight,
        }
    }

    #[tokio::test]
    async fn test_save_derives_all_fields() {
        let service = service();
        let user = Uuid::new_v4();

        let profile = service.save(user, input(), now()).await.unwrap();

        assert!((profile.bmi - 22.857).abs() < 0.001);
        assert_eq!(profile.bmr, 1648.75);
        assert_eq!(profile.tdee, 1648.75 * 1.55);
        assert_eq!(profile.daily_calorie_goal, (1648.75 * 1.55 - 500.0) as i32);
        assert_eq!(profile.daily_water_goal_ml, 2810);
        assert_eq!(profile.created_at, now());
    }

    #[tokio::test]
    async fn test_resave_keeps_id_and_created_at() {
        let service = service();
        let user = Uuid::new_v4();
        let first = service.save(user, input(), now()).await.unwrap();

        let later = now() + Duration::days(3);
        let mut changed = input();
        changed.goal = Goal::GainWeight;
        let second = service.save(user, changed, later).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.updated_at, later);
        assert_eq!(second.daily_calorie_goal, first.daily_calorie_goal + 1000);
    }

    #[tokio::test]
    async fn test_saving_same_inputs_is_idempotent() {
        let service = service();
        let user = Uuid::new_v4();
        let first = service.save(user, input(), now()).await.unwrap();
        let second = service.save(user, input(), now()).await.unwrap();

        assert_eq!(first.derived_metrics(), second.derived_metrics());
    }

    #[tokio::test]
    async fn test_update_weight_rederives() {
        let service = service();
        let user = Uuid::new_v4();
        service.save(user, input(), now()).await.unwrap();

        let updated = service.update_weight(user, 80.0, now()).await.unwrap();

        assert_eq!(updated.current_weight_kg, 80.0);
        assert_eq!(updated.bmr, 1748.75);
        assert_eq!(updated.daily_water_goal_ml, 80 * 33 + 500);
        assert_eq!(updated.target_weight_kg, Some(65.0));
    }

    #[tokio::test]
    async fn test_update_weight_without_profile_is_not_found() {
        let result = service().update_weight(Uuid::new_v4(), 80.0, now()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_writes_nothing() {
        let service = service();
        let user = Uuid::new_v4();
        let mut bad = input();
        bad.current_weight_kg = 0.0;

        let result = service.save(user, bad, now()).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert!(!service.exists(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_non_positive_calorie_goal_is_rejected() {
        let service = service();
        let user = Uuid::new_v4();
        // BMR 10*20 + 6.25*50 - 5*150 - 161 = -398.5
        let extreme = SaveProfileRequest {
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1874, 3, 10).unwrap(),
            height_cm: 50.0,
            current_weight_kg: 20.0,
            target_weight_kg: None,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
        };

        let result = service.save(user, extreme, now()).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert!(!service.exists(user).await.unwrap());
    }

    #[tokio::test]
    async fn test_weight_update_that_zeroes_the_goal_keeps_the_old_profile() {
        let service = service();
        let user = Uuid::new_v4();
        let small = SaveProfileRequest {
            gender: Gender::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1874, 3, 10).unwrap(),
            height_cm: 50.0,
            current_weight_kg: 100.0,
            target_weight_kg: None,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Maintain,
        };
        let saved = service.save(user, small, now()).await.unwrap();
        assert!(saved.daily_calorie_goal > 0);

        let result = service.update_weight(user, 20.0, now()).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert_eq!(service.get_profile(user).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_insights() {
        let service = service();
        let user = Uuid::new_v4();
        service.save(user, input(), now()).await.unwrap();

        let insights = service.get_insights(user).await.unwrap();
        assert_eq!(insights.bmi_category, "Normal");
        assert_eq!(insights.weeks_to_goal, Some(10));
        assert!((insights.ideal_weight_min - 56.656).abs() < 0.01);

        let mut no_target = input();
        no_target.target_weight_kg = None;
        service.save(user, no_target, now()).await.unwrap();
        assert_eq!(service.get_insights(user).await.unwrap().weeks_to_goal, None);
    }

    #[tokio::test]
    async fn test_get_profile_missing() {
        let result = service().get_profile(Uuid::new_v4()).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
