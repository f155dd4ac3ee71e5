//! Hydration repository for database operations

use super::{LogStore, SortOrder, SummableLogStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use health_monitor_shared::WaterLog;
use sqlx::PgPool;
use uuid::Uuid;

/// Water log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WaterLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_ml: i32,
    pub logged_at: DateTime<Utc>,
}

impl From<WaterLogRecord> for WaterLog {
    fn from(r: WaterLogRecord) -> Self {
        WaterLog {
            id: r.id,
            user_id: r.user_id,
            amount_ml: r.amount_ml,
            logged_at: r.logged_at,
        }
    }
}

/// PostgreSQL water log store
#[derive(Clone)]
pub struct PgWaterLogStore {
    pool: PgPool,
}

impl PgWaterLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore<WaterLog> for PgWaterLogStore {
    async fn insert(&self, entry: WaterLog) -> Result<WaterLog> {
        let record = sqlx::query_as::<_, WaterLogRecord>(
            r#"
            INSERT INTO water_logs (id, user_id, amount_ml, logged_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, amount_ml, logged_at
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.amount_ml)
        .bind(entry.logged_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WaterLog>> {
        let record = sqlx::query_as::<_, WaterLogRecord>(
            "SELECT id, user_id, amount_ml, logged_at FROM water_logs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM water_logs WHERE id = $1")
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
    ) -> Result<Vec<WaterLog>> {
        let records = sqlx::query_as::<_, WaterLogRecord>(&format!(
            r#"
            SELECT id, user_id, amount_ml, logged_at
            FROM water_logs
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

    async fn find_by_user(&self, user_id: Uuid, order: SortOrder) -> Result<Vec<WaterLog>> {
        let records = sqlx::query_as::<_, WaterLogRecord>(&format!(
            r#"
            SELECT id, user_id, amount_ml, logged_at
            FROM water_logs
            WHERE user_id = $1
            ORDER BY logged_at {}
            "#,
            order.as_sql()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<WaterLog>> {
        let record = sqlx::query_as::<_, WaterLogRecord>(
            r#"
            SELECT id, user_id, amount_ml, logged_at
            FROM water_logs
            WHERE user_id = $1
            ORDER BY logged_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }
}

#[async_trait]
impl SummableLogStore<WaterLog> for PgWaterLogStore {
    async fn sum_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_ml), 0)::bigint
            FROM water_logs
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
