//! Account routes
//!
//! Register and login are the only `/api/v1` routes that do not need a token.

use crate::auth::AuthUser;
use crate::error::{ApiResult, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use health_monitor_shared::{AuthToken, LoginRequest, RegisterRequest, UserAccount};

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}

/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthToken>)> {
    let token = state
        .services()
        .users
        .register(state.jwt(), req, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(token)))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthToken>> {
    let token = state.services().users.login(state.jwt(), req).await?;
    Ok(Json(token))
}

/// GET /api/v1/user/me
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserAccount>> {
    let account = state.services().users.account(auth.user_id).await?;
    Ok(Json(account))
}
