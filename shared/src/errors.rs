//! Error types for the Health Monitor calculation layer

use thiserror::Error;

/// Errors raised by pure calculations and input validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HealthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl HealthError {
    pub fn invalid(message: impl Into<String>) -> Self {
        HealthError::InvalidInput(message.into())
    }
}

impl From<String> for HealthError {
    fn from(message: String) -> Self {
        HealthError::InvalidInput(message)
    }
}

pub type HealthResult<T> = Result<T, HealthError>;
