//! Route definitions for the Health Monitor API
//!
//! This module organizes all API routes and applies middleware.

use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod exercise;
mod health;
mod hydration;
mod nutrition;
mod profile;
mod statistics;
mod weight;

pub use auth::{auth_routes, user_routes};
pub use exercise::activity_routes;
pub use hydration::water_routes;
pub use nutrition::{food_routes, meal_routes};
pub use profile::profile_routes;
pub use statistics::{dashboard_routes, statistics_routes};
pub use weight::weight_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .route("/metrics", get(health::metrics))
        .nest("/api/v1", api_routes())
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API v1 routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { "Health Monitor API v1" }))
        .nest("/auth", auth_routes())
        .nest("/user", user_routes())
        .nest("/profile", profile_routes())
        .nest("/weight", weight_routes())
        .nest("/water", water_routes())
        .nest("/foods", food_routes())
        .nest("/meal", meal_routes())
        .nest("/activity", activity_routes())
        .nest("/statistics", statistics_routes())
        .nest("/dashboard", dashboard_routes())
}
