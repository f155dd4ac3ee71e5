//! Water log API routes

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
use health_monitor_shared::{LogWaterRequest, RangeQuery, TodayWater, WaterLog, WaterStats};
use uuid::Uuid;

pub fn water_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_water))
        .route("/today/total", get(get_today_total))
        .route("/history", get(get_history))
        .route("/stats", get(get_stats))
        .route("/:id", delete(delete_water))
}

/// POST /api/v1/water
async fn log_water(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<LogWaterRequest>,
) -> Result<(StatusCode, Json<WaterLog>), ApiError> {
    let entry = state
        .services()
        .hydration
        .log_water(auth.user_id, req.amount_ml, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /api/v1/water/today/total
async fn get_today_total(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TodayWater>, ApiError> {
    let total = state
        .services()
        .hydration
        .today_total(auth.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(total))
}

/// GET /api/v1/water/history?from=&to=
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<WaterLog>>, ApiError> {
    let logs = state
        .services()
        .hydration
        .history(auth.user_id, query.range()?)
        .await?;
    Ok(Json(logs))
}

/// GET /api/v1/water/stats?from=&to=
async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<WaterStats>, ApiError> {
    let stats = state
        .services()
        .hydration
        .stats(auth.user_id, query.range()?)
        .await?;
    Ok(Json(stats))
}

/// DELETE /api/v1/water/:id
async fn delete_water(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services().hydration.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
