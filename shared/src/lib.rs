//! Health Monitor Shared Library
//!
//! This crate contains the pure health calculations, domain models and
//! request/response types used by the backend and WASM modules.

pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use health_metrics::*;
pub use models::*;
pub use types::*;
