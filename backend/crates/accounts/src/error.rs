//! Accounts error types.
//!
//! Account-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Accounts result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Accounts error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// Input failed a format/length/content rule; the message is the first
    /// violated rule and is safe to show to the user.
    #[error("{0}")]
    Validation(String),

    /// Registration attempted with an email/username already in use
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Referenced account does not exist
    #[error("Account not found")]
    NotFound,

    /// Wrong password or unknown email, deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Sign-in attempt on a disabled account
    #[error("Account is disabled")]
    AccountDisabled,

    /// Reset code absent, expired, or mismatched, deliberately uniform
    #[error("Invalid or expired OTP")]
    OtpInvalid,

    /// Session missing, malformed, or expired
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Admin privileges required
    #[error("Access denied. Admin privileges required")]
    AccessDenied,

    /// Admin tried to delete their own account
    #[error("Cannot delete your own account")]
    CannotDeleteSelf,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::Validation(_) => StatusCode::BAD_REQUEST,
            AccountError::EmailTaken | AccountError::CannotDeleteSelf => StatusCode::CONFLICT,
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::InvalidCredentials
            | AccountError::OtpInvalid
            | AccountError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AccountError::AccountDisabled | AccountError::AccessDenied => StatusCode::FORBIDDEN,
            AccountError::Database(_) | AccountError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Validation(_) => ErrorKind::BadRequest,
            AccountError::EmailTaken | AccountError::CannotDeleteSelf => ErrorKind::Conflict,
            AccountError::NotFound => ErrorKind::NotFound,
            AccountError::InvalidCredentials
            | AccountError::OtpInvalid
            | AccountError::SessionInvalid => ErrorKind::Unauthorized,
            AccountError::AccountDisabled | AccountError::AccessDenied => ErrorKind::Forbidden,
            AccountError::Database(_) | AccountError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with an appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            AccountError::AccountDisabled => {
                tracing::warn!("Sign-in attempt on disabled account");
            }
            AccountError::AccessDenied => {
                tracing::warn!("Admin route rejected for non-admin session");
            }
            _ => {
                tracing::debug!(error = %self, "Accounts error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AccountError {
    fn from(err: AppError) -> Self {
        AccountError::Internal(err.to_string())
    }
}

impl From<platform::password::PasswordHashError> for AccountError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AccountError::Internal(err.to_string())
    }
}
