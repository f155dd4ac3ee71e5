//! Nutrition repository: food catalog and meal logs

use super::{FoodCatalog, LogStore, SortOrder, SummableLogStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use health_monitor_shared::{Food, MealLog};
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// Food Catalog
// ============================================================================

/// Food record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: Uuid,
    pub name: String,
    pub serving: String,
    pub kcal_per_serving: i32,
}

impl From<FoodRecord> for Food {
    fn from(r: FoodRecord) -> Self {
        Food {
            id: r.id,
            name: r.name,
            serving: r.serving,
            kcal_per_serving: r.kcal_per_serving,
        }
    }
}

/// PostgreSQL food catalog
#[derive(Clone)]
pub struct PgFoodCatalog {
    pool: PgPool,
}

impl PgFoodCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FoodCatalog for PgFoodCatalog {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Food>> {
        let record = sqlx::query_as::<_, FoodRecord>(
            "SELECT id, name, serving, kcal_per_serving FROM foods WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn find_by_name_ignore_case(&self, name: &str) -> Result<Option<Food>> {
        let record = sqlx::query_as::<_, FoodRecord>(
            "SELECT id, name, serving, kcal_per_serving FROM foods WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn search(&self, query: &str) -> Result<Vec<Food>> {
        // POSITION avoids treating % and _ in the query as LIKE wildcards
        let records = sqlx::query_as::<_, FoodRecord>(
            r#"
            SELECT id, name, serving, kcal_per_serving
            FROM foods
            WHERE POSITION(LOWER($1) IN LOWER(name)) > 0
            ORDER BY name
            "#,
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, food: Food) -> Result<Food> {
        let record = sqlx::query_as::<_, FoodRecord>(
            r#"
            INSERT INTO foods (id, name, serving, kcal_per_serving)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, serving, kcal_per_serving
            "#,
        )
        .bind(food.id)
        .bind(&food.name)
        .bind(&food.serving)
        .bind(food.kcal_per_serving)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }
}

// ============================================================================
// Meal Logs
// ============================================================================

/// Meal log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Uuid,
    pub food_name: String,
    pub servings: f64,
    pub total_kcal: i32,
    pub logged_at: DateTime<Utc>,
}

impl From<MealLogRecord> for MealLog {
    fn from(r: MealLogRecord) -> Self {
        MealLog {
            id: r.id,
            user_id: r.user_id,
            food_id: r.food_id,
            food_name: r.food_name,
            servings: r.servings,
            total_kcal: r.total_kcal,
            logged_at: r.logged_at,
        }
    }
}

const MEAL_COLUMNS: &str = "id, user_id, food_id, food_name, servings, total_kcal, logged_at";

/// PostgreSQL meal log store
#[derive(Clone)]
pub struct PgMealLogStore {
    pool: PgPool,
}

impl PgMealLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore<MealLog> for PgMealLogStore {
    async fn insert(&self, entry: MealLog) -> Result<MealLog> {
        let record = sqlx::query_as::<_, MealLogRecord>(&format!(
            r#"
            INSERT INTO meal_logs ({MEAL_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.food_id)
        .bind(&entry.food_name)
        .bind(entry.servings)
        .bind(entry.total_kcal)
        .bind(entry.logged_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MealLog>> {
        let record = sqlx::query_as::<_, MealLogRecord>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meal_logs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_logs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        order: SortOrder,
    ) -> Result<Vec<MealLog>> {
        let records = sqlx::query_as::<_, MealLogRecord>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meal_logs
            WHERE user_id = $1 AND logged_at >= $2 AND logged_at <= $3
            ORDER BY logged_at {}
            "#,
            order.as_sql()
        ))
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn find_by_user(&self, user_id: Uuid, order: SortOrder) -> Result<Vec<MealLog>> {
        let records = sqlx::query_as::<_, MealLogRecord>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meal_logs WHERE user_id = $1 ORDER BY logged_at {}",
            order.as_sql()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<MealLog>> {
        let record = sqlx::query_as::<_, MealLogRecord>(&format!(
            "SELECT {MEAL_COLUMNS} FROM meal_logs WHERE user_id = $1 \
             ORDER BY logged_at DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }
}

#[async_trait]
impl SummableLogStore<MealLog> for PgMealLogStore {
    async fn sum_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_kcal), 0)::bigint
            FROM meal_logs
            WHERE user_id = $1 AND logged_at >= $2 AND logged_at <= $3
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
