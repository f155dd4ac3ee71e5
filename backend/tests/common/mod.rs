//! Common test utilities for integration tests
//!
//! `TestApp::new` runs the full router over the in-memory stores, so most
//! tests need no database. `TestApp::postgres` is for `#[ignore]`d tests.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use health_monitor_backend::{
    config::AppConfig,
    db,
    repositories::{starter_foods, Stores},
    routes,
    services::Services,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    /// Full router over empty in-memory stores with the starter food catalog
    pub fn new() -> Self {
        let stores = Stores::in_memory(starter_foods());
        Self::from_state(AppState::new(
            Services::new(stores),
            None,
            test_config(),
            None,
        ))
    }

    /// Full router over PostgreSQL at `DATABASE_URL`
    pub async fn postgres() -> Self {
        let mut config = test_config();
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }
        let pool = db::create_pool(&config.database)
            .await
            .expect("Failed to connect to test database");
        db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self::from_state(AppState::new(
            Services::new(Stores::postgres(pool.clone())),
            Some(pool),
            config,
            None,
        ))
    }

    fn from_state(state: AppState) -> Self {
        Self {
            app: routes::create_router(state.clone()),
            state,
        }
    }

    /// A fresh user id and a valid access token for it
    pub fn user(&self) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = self
            .state
            .jwt()
            .generate_access_token(user_id)
            .expect("Failed to sign token");
        (user_id, token)
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }

    pub async fn get(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(token), None).await
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(token), Some(body)).await
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, path, Some(token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, Some(token), None).await
    }

    /// POST without an Authorization header
    pub async fn anonymous_post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, None, Some(body)).await
    }

    /// Register an account and return its access token
    pub async fn register(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .anonymous_post(
                "/api/v1/auth/register",
                serde_json::json!({
                    "email": email,
                    "password": password,
                    "full_name": "Test User"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        body["access_token"]
            .as_str()
            .expect("register returns an access token")
            .to_string()
    }

    /// Save a profile that the assertions in the tests rely on
    pub async fn create_profile(&self, token: &str) -> Value {
        let (status, body) = self.post("/api/v1/profile", token, sample_profile()).await;
        assert_eq!(status, StatusCode::OK, "profile save failed: {body}");
        body
    }
}

/// Male, 30 on 2024-01-01, 175 cm, 70 kg, moderately active, losing weight
pub fn sample_profile() -> Value {
    serde_json::json!({
        "gender": "MALE",
        "date_of_birth": "1994-01-01",
        "height_cm": 175.0,
        "current_weight_kg": 70.0,
        "target_weight_kg": 65.0,
        "activity_level": "MODERATELY_ACTIVE",
        "goal": "LOSE_WEIGHT"
    })
}

/// Create test configuration
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = "test-secret-key-that-is-at-least-32-chars".to_string();
    config
}
