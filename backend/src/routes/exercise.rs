//! Activity log API routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use health_monitor_shared::{ActivityLog, LogActivityRequest, RangeQuery, TodayKcal};
use uuid::Uuid;

pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_activity))
        .route("/today/total", get(get_today_total))
        .route("/history", get(get_history))
        .route("/:id", delete(delete_activity))
}

/// POST /api/v1/activity
///
/// `weight_kg` is optional and falls back to the profile's current weight.
async fn log_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<LogActivityRequest>,
) -> Result<(StatusCode, Json<ActivityLog>), ApiError> {
    let log = state
        .services()
        .exercise
        .log_activity(
            auth.user_id,
            req.name,
            req.met,
            req.minutes,
            req.weight_kg,
            Utc::now(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(log)))
}

/// GET /api/v1/activity/today/total
async fn get_today_total(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TodayKcal>, ApiError> {
    let total = state
        .services()
        .exercise
        .today_total(auth.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(total))
}

/// GET /api/v1/activity/history?from=&to=
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<ActivityLog>>, ApiError> {
    let logs = state
        .services()
        .exercise
        .history(auth.user_id, query.range()?)
        .await?;
    Ok(Json(logs))
}

/// DELETE /api/v1/activity/:id
async fn delete_activity(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services().exercise.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
