//! Accounts backend module.
//!
//! Clean Architecture structure:
//! - `domain/` - entities, value objects, repository traits, OTP store
//! - `application/` - use cases and application services
//! - `infra/` - PostgreSQL implementations
//! - `presentation/` - HTTP handlers, DTOs, router, authorization gate
//!
//! ## Features
//! - Registration with customer/admin role assignment
//! - Sign-in with email or username, server-side sessions
//! - Password reset via emailed one-time codes
//! - Profile management
//! - Admin user management (list, search, enable/disable, delete)
//!
//! ## Security model
//! - Passwords hashed with Argon2id
//! - Session tokens are HMAC-SHA256 signed, carried in HttpOnly cookies
//! - Disabled accounts cannot sign in
//! - Admin routes are gated on the session's role

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AccountsConfig;
pub use domain::otp_store::OtpStore;
pub use error::{AccountError, AccountResult};
pub use infra::postgres::PgAccountRepository;
pub use presentation::router::accounts_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
