//! Profile repository for database operations

use super::ProfileStore;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use health_monitor_shared::{ActivityLevel, Gender, Goal, Profile};
use sqlx::PgPool;
use uuid::Uuid;

/// Profile record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProfileRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub gender: String,
    pub date_of_birth: NaiveDate,
    pub height_cm: f64,
    pub current_weight_kg: f64,
    pub target_weight_kg: Option<f64>,
    pub activity_level: String,
    pub goal: String,
    pub bmi: f64,
    pub bmr: f64,
    pub tdee: f64,
    pub daily_calorie_goal: i32,
    pub daily_water_goal_ml: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRecord> for Profile {
    fn from(r: ProfileRecord) -> Self {
        Profile {
            id: r.id,
            user_id: r.user_id,
            gender: Gender::parse_lenient(&r.gender),
            date_of_birth: r.date_of_birth,
            height_cm: r.height_cm,
            current_weight_kg: r.current_weight_kg,
            target_weight_kg: r.target_weight_kg,
            activity_level: ActivityLevel::parse_lenient(&r.activity_level),
            goal: Goal::parse_lenient(&r.goal),
            bmi: r.bmi,
            bmr: r.bmr,
            tdee: r.tdee,
            daily_calorie_goal: r.daily_calorie_goal,
            daily_water_goal_ml: r.daily_water_goal_ml,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const PROFILE_COLUMNS: &str = "id, user_id, gender, date_of_birth, height_cm, current_weight_kg, \
    target_weight_kg, activity_level, goal, bmi, bmr, tdee, daily_calorie_goal, \
    daily_water_goal_ml, created_at, updated_at";

/// PostgreSQL profile store
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Profile::from))
    }

    /// Single upsert statement; `id` and `created_at` of an existing row are kept
    async fn save(&self, profile: Profile) -> Result<Profile> {
        let record = sqlx::query_as::<_, ProfileRecord>(&format!(
            r#"
            INSERT INTO profiles ({PROFILE_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (user_id) DO UPDATE SET
                gender = EXCLUDED.gender,
                date_of_birth = EXCLUDED.date_of_birth,
                height_cm = EXCLUDED.height_cm,
                current_weight_kg = EXCLUDED.current_weight_kg,
                target_weight_kg = EXCLUDED.target_weight_kg,
                activity_level = EXCLUDED.activity_level,
                goal = EXCLUDED.goal,
                bmi = EXCLUDED.bmi,
                bmr = EXCLUDED.bmr,
                tdee = EXCLUDED.tdee,
                daily_calorie_goal = EXCLUDED.daily_calorie_goal,
                daily_water_goal_ml = EXCLUDED.daily_water_goal_ml,
                updated_at = EXCLUDED.updated_at
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(profile.gender.as_str())
        .bind(profile.date_of_birth)
        .bind(profile.height_cm)
        .bind(profile.current_weight_kg)
        .bind(profile.target_weight_kg)
        .bind(profile.activity_level.as_str())
        .bind(profile.goal.as_str())
        .bind(profile.bmi)
        .bind(profile.bmr)
        .bind(profile.tdee)
        .bind(profile.daily_calorie_goal)
        .bind(profile.daily_water_goal_ml)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn exists(&self, user_id: Uuid) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM profiles WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }
}
