//! Weight log API routes

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
use health_monitor_shared::{LogWeightRequest, RangeQuery, WeightLogEntry, WeightProgress};
use uuid::Uuid;

/// Create weight routes
pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_weight))
        .route("/history", get(get_history))
        .route("/latest", get(get_latest))
        .route("/progress", get(get_progress))
        .route("/:id", delete(delete_weight))
}

/// POST /api/v1/weight - Log a weight entry and update the profile
async fn log_weight(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<LogWeightRequest>,
) -> Result<(StatusCode, Json<WeightLogEntry>), ApiError> {
    let entry = state
        .services()
        .weight
        .log_weight(auth.user_id, req.weight_kg, req.note, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/weight/history - All entries, newest first
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<WeightLogEntry>>, ApiError> {
    let history = state.services().weight.history(auth.user_id).await?;
    Ok(Json(history))
}

/// GET /api/v1/weight/latest
async fn get_latest(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<WeightLogEntry>, ApiError> {
    let latest = state.services().weight.latest(auth.user_id).await?;
    Ok(Json(latest))
}

/// GET /api/v1/weight/progress?from=&to=
async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<WeightProgress>, ApiError> {
    let progress = state
        .services()
        .weight
        .progress(auth.user_id, query.range()?)
        .await?;
    Ok(Json(progress))
}

/// DELETE /api/v1/weight/:id
async fn delete_weight(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .services()
        .weight
        .delete_log(auth.user_id, id, Utc::now())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
