//! Statistics and dashboard API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use health_monitor_shared::{
    DailyStats, MonthQuery, MonthlyStats, RangeQuery, SummaryStats, TodayDashboard, WeekOverview,
    WeeklyStats,
};

pub fn statistics_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/daily", get(get_daily))
        .route("/weekly", get(get_weekly))
        .route("/monthly", get(get_monthly))
}

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/today", get(get_today))
        .route("/week", get(get_week))
}

/// GET /api/v1/statistics/summary?from=&to=
async fn get_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<SummaryStats>, ApiError> {
    let stats = state
        .services()
        .statistics
        .summary(auth.user_id, query.range()?)
        .await?;
    Ok(Json(stats))
}

/// GET /api/v1/statistics/daily?from=&to=
async fn get_daily(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<DailyStats>>, ApiError> {
    let days = state
        .services()
        .statistics
        .daily(auth.user_id, query.range()?)
        .await?;
    Ok(Json(days))
}

/// GET /api/v1/statistics/weekly - The seven days ending today
async fn get_weekly(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<WeeklyStats>, ApiError> {
    let stats = state
        .services()
        .statistics
        .weekly(auth.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(stats))
}

/// GET /api/v1/statistics/monthly?year=&month=
async fn get_monthly(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlyStats>, ApiError> {
    let stats = state
        .services()
        .statistics
        .monthly(auth.user_id, query.year, query.month, Utc::now().date_naive())
        .await?;
    Ok(Json(stats))
}

/// GET /api/v1/dashboard/today
async fn get_today(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TodayDashboard>, ApiError> {
    let dashboard = state
        .services()
        .statistics
        .today(auth.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(dashboard))
}

/// GET /api/v1/dashboard/week
async fn get_week(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<WeekOverview>, ApiError> {
    let overview = state
        .services()
        .statistics
        .week_overview(auth.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(overview))
}
