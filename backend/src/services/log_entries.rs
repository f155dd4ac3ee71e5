//! Behaviour shared by every log kind

use crate::error::ApiError;
use crate::repositories::LogStore;
use health_monitor_shared::LogEntry;
use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

/// Record a created entry in the per-kind counter
pub(crate) fn record_created(kind: &'static str) {
    counter!("health_monitor_log_entries_created_total", "kind" => kind).increment(1);
}

/// Delete a log entry owned by `user_id`
///
/// `NotFound` when the id is unknown, `Forbidden` when another user owns it.
/// Nothing is mutated in either case. Returns the removed entry.
pub async fn delete_owned<T, S>(
    store: &S,
    kind: &'static str,
    user_id: Uuid,
    id: Uuid,
) -> Result<T, ApiError>
where
    T: LogEntry + Clone + Send + Sync + 'static,
    S: LogStore<T> + ?Sized,
{
    let entry = store
        .find_by_id(id)
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound(format!("{kind} log {id} not found")))?;

    if entry.user_id() != user_id {
        warn!(%user_id, log_id = %id, kind, "Rejected delete of another user's log entry");
        return Err(ApiError::Forbidden(format!(
            "{kind} log {id} belongs to another user"
        )));
    }

    store.delete_by_id(id).await.map_err(ApiError::Internal)?;

    counter!("health_monitor_log_entries_deleted_total", "kind" => kind).increment(1);
    info!(%user_id, log_id = %id, kind, "Log entry deleted");

    Ok(entry)
}
