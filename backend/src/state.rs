//! Application state management
//!
//! This module provides the shared application state that is passed
//! to all request handlers via Axum's state extraction.
//!
//! # Design Principles
//!
//! 1. **Pre-compute expensive resources**: JWT keys and services are built once
//! 2. **Cheap cloning**: All fields use Arc or are already Clone-cheap
//! 3. **Immutable after creation**: State is read-only during request handling

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::services::Services;
use metrics_exporter_prometheus::PrometheusHandle;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
///
/// - `services`: every service holds `Arc`'d stores, cloning is O(1)
/// - `db`: present only with the postgres storage backend
/// - `metrics`: present when a Prometheus recorder was installed
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub db: Option<PgPool>,
    pub config: Arc<AppConfig>,
    pub jwt: JwtService,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create a new application state
    ///
    /// Derives the JWT keys from the config secret, so call it once at
    /// startup.
    pub fn new(
        services: Services,
        db: Option<PgPool>,
        config: AppConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let jwt = JwtService::new(&config.jwt.secret, config.jwt.access_token_expiry_secs);

        Self {
            services,
            db,
            config: Arc::new(config),
            jwt,
            metrics,
        }
    }

    #[inline]
    pub fn services(&self) -> &Services {
        &self.services
    }

    #[inline]
    pub fn db(&self) -> Option<&PgPool> {
        self.db.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::Stores;

    fn memory_state() -> AppState {
        AppState::new(
            Services::new(Stores::in_memory(Vec::new())),
            None,
            AppConfig::default(),
            None,
        )
    }

    #[tokio::test]
    async fn test_memory_state_has_no_pool() {
        let state = memory_state();
        assert!(state.db().is_none());

        let cloned = state.clone();
        assert_eq!(cloned.config().server.port, state.config().server.port);
    }

    #[tokio::test]
    async fn test_jwt_service_is_precomputed() {
        let state = memory_state();

        let user_id = uuid::Uuid::new_v4();
        let token = state.jwt().generate_access_token(user_id).unwrap();
        assert_eq!(state.jwt().validate_access_token(&token).unwrap(), user_id);
    }
}
