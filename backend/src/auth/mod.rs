//! Authentication module
//!
//! JWT Bearer authentication for every `/api/v1` route, plus Argon2 password
//! hashing for the account endpoints.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService};
pub use middleware::AuthUser;
pub use password::PasswordService;
