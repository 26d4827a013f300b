//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::account::{Account, RoleProfile};

// ============================================================================
// Register
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
}

/// Registration response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub account_id: String,
    pub role: String,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Email or username
    pub identifier: String,
    pub password: String,
}

/// Sign in response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub account_id: String,
    pub role: String,
    pub display_name: String,
    pub expires_at: DateTime<Utc>,
}

// ============================================================================
// Session Status
// ============================================================================

/// Session status response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub account_id: Option<String>,
    pub role: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Profile
// ============================================================================

/// Profile response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub account_id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileResponse {
    pub fn from_account(account: &Account) -> Self {
        let (full_name, phone_number) = match &account.profile {
            RoleProfile::Customer(p) => (
                Some(p.full_name.as_str().to_string()),
                Some(p.phone_number.as_str().to_string()),
            ),
            RoleProfile::Admin(_) => (None, None),
        };

        Self {
            account_id: account.account_id.to_string(),
            email: account.email.as_str().to_string(),
            username: account.username.clone(),
            role: account.role().code().to_string(),
            full_name,
            phone_number,
            enabled: account.enabled,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Profile update request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: String,
    pub phone_number: String,
}

// ============================================================================
// Password Reset
// ============================================================================

/// Forgot password request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// OTP verification request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

/// Reset password request (code and new password together)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Plain message response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMessage {
    pub message: String,
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Admin: User Management
// ============================================================================

/// One account in the admin listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryResponse {
    pub account_id: String,
    pub display_name: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&crate::application::AccountSummary> for UserSummaryResponse {
    fn from(summary: &crate::application::AccountSummary) -> Self {
        Self {
            account_id: summary.account_id.to_string(),
            display_name: summary.display_name.clone(),
            email: summary.email.clone(),
            username: summary.username.clone(),
            role: summary.role.code().to_string(),
            enabled: summary.enabled,
            created_at: summary.created_at,
        }
    }
}

/// Admin listing with per-role counts
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<UserSummaryResponse>,
    pub total: usize,
    pub admin_count: usize,
    pub customer_count: usize,
}

/// Search query string
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Toggle-enabled response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleEnabledResponse {
    pub account_id: String,
    pub enabled: bool,
}
