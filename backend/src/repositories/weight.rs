//! Weight log repository for database operations

use super::{LogStore, SortOrder};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use health_monitor_shared::WeightLogEntry;
use sqlx::PgPool;
use uuid::Uuid;

/// Weight log record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub weight_kg: f64,
    pub bmi: f64,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl From<WeightLogRecord> for WeightLogEntry {
    fn from(r: WeightLogRecord) -> Self {
        WeightLogEntry {
            id: r.id,
            user_id: r.user_id,
            weight_kg: r.weight_kg,
            bmi: r.bmi,
            note: r.note,
            logged_at: r.logged_at,
        }
    }
}

/// PostgreSQL weight log store
#[derive(Clone)]
pub struct PgWeightLogStore {
    pool: PgPool,
}

impl PgWeightLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LogStore<WeightLogEntry> for PgWeightLogStore {
    async fn insert(&self, entry: WeightLogEntry) -> Result<WeightLogEntry> {
        let record = sqlx::query_as::<_, WeightLogRecord>(
            r#"
            INSERT INTO weight_logs (id, user_id, weight_kg, bmi, note, logged_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, weight_kg, bmi, note, logged_at
            "#,
        )
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.weight_kg)
        .bind(entry.bmi)
        .bind(&entry.note)
        .bind(entry.logged_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(record.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<WeightLogEntry>> {
        let record = sqlx::query_as::<_, WeightLogRecord>(
            r#"
            SELECT id, user_id, weight_kg, bmi, note, logged_at
            FROM weight_logs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(Into::into))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM weight_logs WHERE id = $1")
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
    ) -> Result<Vec<WeightLogEntry>> {
        let records = sqlx::query_as::<_, WeightLogRecord>(&format!(
            r#"
            SELECT id, user_id, weight_kg, bmi, note, logged_at
            FROM weight_logs
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

    async fn find_by_user(&self, user_id: Uuid, order: SortOrder) -> Result<Vec<WeightLogEntry>> {
        let records = sqlx::query_as::<_, WeightLogRecord>(&format!(
            r#"
            SELECT id, user_id, weight_kg, bmi, note, logged_at
            FROM weight_logs
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

    async fn find_latest_by_user(&self, user_id: Uuid) -> Result<Option<WeightLogEntry>> {
        let record = sqlx::query_as::<_, WeightLogRecord>(
            r#"
            SELECT id, user_id, weight_kg, bmi, note, logged_at
            FROM weight_logs
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
