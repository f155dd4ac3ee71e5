//! Activity log repository for database operations

use super::{LogStore, SortOrder, SummableLogStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use health_monitor_shared::ActivityLog;
use sqlx::PgPool;
use uuid::Uuid;

/// Activity log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub met: f64,
    pub minutes: i32,
    pub weight_kg_at_time: f64,
    pub total_kcal: i32,
    pub logged_at: DateTime<Utc>,
}

impl From<ActivityLogRecord> for ActivityLog {
    fn from(r: ActivityLogRecord) -> Self {
        ActivityLog {
            id: r.id,
            user_id: r.user_id,
            name: r.name,
            met: r.met,
            minutes: r.minutes,
            weight_kg_at_time: r.weight_kg_at_time,
            total_kcal: r.total_kcal,
            logged_at: r.logged_at,
        }
    }
}

const ACTIVITY_COLUMNS: &str =
    "id, user_id, name, met, minutes, weight_kg_at_time, total_kcal, logged_at";

/// PostgreSQL activity log store
#[derive(Clone)]
pub struct PgActivityLogStore {
    pool: PgPool,
}

impl PgActivityLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore<ActivityLog> for PgActivityLogStore {
    async fn insert(&self, entry: ActivityLog) -> Result<ActivityLog> {
        let record = sqlx::query_as::<_, ActivityLogRecord>(&format!(
            r#"
            INSERT INTO activity_logs ({ACTIVITY_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ACTIVITY_COLUMNS}
            "#
        ))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(&entry.name)
        .bind(entry.met)
        .bind(entry.minutes)
        .bind(entry.weight_kg_at_time)
        .bind(entry.total_kcal)
        .bind(entry.logged_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ActivityLog>> {
        let record = sqlx::query_as::<_, ActivityLogRecord>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM activity_logs WHERE id = $1")
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
    ) -> Result<Vec<ActivityLog>> {
        let records = sqlx::query_as::<_, ActivityLogRecord>(&format!(
            r#"
            SELECT {ACTIVITY_COLUMNS}
            FROM activity_logs
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

    async fn find_by_user(&self, user_id: Uuid, order: SortOrder) -> Result<Vec<ActivityLog>> {
        let records = sqlx::query_as::<_, ActivityLogRecord>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs WHERE user_id = $1 ORDER BY logged_at {}",
            order.as_sql()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<ActivityLog>> {
        let record = sqlx::query_as::<_, ActivityLogRecord>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs WHERE user_id = $1 \
             ORDER BY logged_at DESC LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }
}

#[async_trait]
impl SummableLogStore<ActivityLog> for PgActivityLogStore {
    async fn sum_by_user_and_range(
        &self,
        user_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(total_kcal), 0)::bigint
            FROM activity_logs
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
