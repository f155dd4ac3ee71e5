//! User service for registration, login and the caller's account
//!
//! Emails are trimmed and lowercased before every lookup. Password hashing
//! and verification run on the blocking thread pool.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::UserStore;
use chrono::{DateTime, Utc};
use health_monitor_shared::{AuthToken, LoginRequest, RegisterRequest, User, UserAccount};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

const DEFAULT_ROLES: &str = "USER";
const MIN_PASSWORD_LEN: usize = 8;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

fn issue_token(jwt: &JwtService, user_id: Uuid) -> Result<AuthToken, ApiError> {
    let access_token = jwt
        .generate_access_token(user_id)
        .map_err(ApiError::Internal)?;

    Ok(AuthToken {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt.access_token_expiry_secs(),
    })
}

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Create an account and return an access token for it
    pub async fn register(
        &self,
        jwt: &JwtService,
        req: RegisterRequest,
        now: DateTime<Utc>,
    ) -> Result<AuthToken, ApiError> {
        let email = normalize_email(&req.email);
        if !email.validate_email() {
            return Err(ApiError::Validation {
                message: "Invalid email format".to_string(),
                field: Some("email".to_string()),
            });
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation {
                message: format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
                field: Some("password".to_string()),
            });
        }
        let full_name = req.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ApiError::Validation {
                message: "Full name is required".to_string(),
                field: Some("full_name".to_string()),
            });
        }

        if self.find_by_email(&email).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = PasswordService::hash_async(req.password)
            .await
            .map_err(ApiError::Internal)?;

        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            full_name,
            roles: DEFAULT_ROLES.to_string(),
            created_at: now,
        };

        // A concurrent registration may have claimed the email since the check
        let user = self
            .users
            .insert(user)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(email_taken)?;

        info!(user_id = %user.id, "User registered");
        issue_token(jwt, user.id)
    }

    /// Exchange email and password for an access token
    ///
    /// Unknown emails and wrong passwords get the same error.
    pub async fn login(&self, jwt: &JwtService, req: LoginRequest) -> Result<AuthToken, ApiError> {
        let email = normalize_email(&req.email);
        let user = self
            .find_by_email(&email)
            .await?
            .ok_or_else(invalid_credentials)?;

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;
        if !valid {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(invalid_credentials());
        }

        info!(user_id = %user.id, "User logged in");
        issue_token(jwt, user.id)
    }

    pub async fn account(&self, user_id: Uuid) -> Result<UserAccount, ApiError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(UserAccount::from)
            .ok_or_else(|| ApiError::NotFound(format!("User {user_id} not found")))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        self.users
            .find_by_email(email)
            .await
            .map_err(ApiError::Internal)
    }
}

fn email_taken() -> ApiError {
    ApiError::Conflict("Email already registered".to_string())
}
