//! Food catalog and meal log API routes

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
use health_monitor_shared::{Food, FoodSearchQuery, LogMealRequest, MealLog, RangeQuery, TodayKcal};
use uuid::Uuid;

pub fn food_routes() -> Router<AppState> {
    Router::new().route("/", get(search_foods))
}

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_meal))
        .route("/today/total", get(get_today_total))
        .route("/history", get(get_history))
        .route("/:id", delete(delete_meal))
}

/// GET /api/v1/foods?q= - Case-insensitive name search; no query lists all
async fn search_foods(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<FoodSearchQuery>,
) -> Result<Json<Vec<Food>>, ApiError> {
    let foods = state
        .services()
        .nutrition
        .search_foods(query.q.as_deref())
        .await?;
    Ok(Json(foods))
}

/// POST /api/v1/meal - Log by `food_id` or by case-insensitive `food_name`
async fn log_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<LogMealRequest>,
) -> Result<(StatusCode, Json<MealLog>), ApiError> {
    let food = req.food_ref()?;
    let meal = state
        .services()
        .nutrition
        .log_meal(auth.user_id, food, req.servings, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

/// GET /api/v1/meal/today/total
async fn get_today_total(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<TodayKcal>, ApiError> {
    let total = state
        .services()
        .nutrition
        .today_total(auth.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(total))
}

/// GET /api/v1/meal/history?from=&to=
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<MealLog>>, ApiError> {
    let meals = state
        .services()
        .nutrition
        .history(auth.user_id, query.range()?)
        .await?;
    Ok(Json(meals))
}

/// DELETE /api/v1/meal/:id
async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.services().nutrition.delete(auth.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
