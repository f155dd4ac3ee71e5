//! Profile API routes

use crate::auth::AuthUser;
use crate::error::{ApiError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use chrono::Utc;
use health_monitor_shared::{HealthInsights, Profile, SaveProfileRequest, UpdateWeightRequest};

/// Create profile routes
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_profile).post(save_profile))
        .route("/weight", patch(update_weight))
        .route("/insights", get(get_insights))
}

/// GET /api/v1/profile
async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Profile>, ApiError> {
    let profile = state.services().profiles.get_profile(auth.user_id).await?;
    Ok(Json(profile))
}

/// POST /api/v1/profile - Create or replace the profile
///
/// Derived fields in the response are always recomputed server-side.
async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SaveProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .services()
        .profiles
        .save(auth.user_id, req, Utc::now())
        .await?;
    Ok(Json(profile))
}

/// PATCH /api/v1/profile/weight
async fn update_weight(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateWeightRequest>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .services()
        .profiles
        .update_weight(auth.user_id, req.weight_kg, Utc::now())
        .await?;
    Ok(Json(profile))
}

/// GET /api/v1/profile/insights
async fn get_insights(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<HealthInsights>, ApiError> {
    let insights = state.services().profiles.get_insights(auth.user_id).await?;
    Ok(Json(insights))
}
