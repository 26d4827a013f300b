//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::CookieConfig;
use platform::mailer::OtpMailer;

use crate::application::config::AccountsConfig;
use crate::application::{
    AuthenticateInput, AuthenticateUseCase, CheckSessionUseCase, ManageUsersUseCase,
    PasswordResetUseCase, RegisterInput, RegisterUseCase, SignOutUseCase, UpdateProfileInput,
    UpdateProfileUseCase,
};
use crate::domain::otp_store::OtpStore;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, AccountRole};
use crate::error::{AccountError, AccountResult};
use crate::presentation::dto::{
    ApiMessage, ForgotPasswordRequest, ProfileResponse, RegisterRequest, RegisterResponse,
    ResetPasswordRequest, SearchQuery, SessionStatusResponse, SignInRequest, SignInResponse,
    ToggleEnabledResponse, UpdateProfileRequest, UserListResponse, UserSummaryResponse,
    VerifyOtpRequest,
};
use crate::presentation::middleware::CurrentSession;

/// Shared state for account handlers
pub struct AccountsAppState<R, M>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub otp_store: Arc<OtpStore>,
    pub mailer: Arc<M>,
    pub config: Arc<AccountsConfig>,
}

impl<R, M> Clone for AccountsAppState<R, M>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            otp_store: self.otp_store.clone(),
            mailer: self.mailer.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/accounts/register
pub async fn register<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<RegisterRequest>,
) -> AccountResult<(StatusCode, Json<RegisterResponse>)>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    // Role assignment is a deployment decision: exactly the configured
    // bootstrap address becomes an admin, and the grant is logged.
    let role = if state.config.is_bootstrap_admin(&req.email) {
        tracing::info!(email = %req.email, "Registering configured bootstrap admin");
        AccountRole::Admin
    } else {
        AccountRole::Customer
    };

    let use_case = RegisterUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(RegisterInput {
            full_name: req.full_name,
            email: req.email,
            password: req.password,
            phone_number: req.phone_number,
            role,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            account_id: output.account_id.to_string(),
            role: output.role.code().to_string(),
        }),
    ))
}

// ============================================================================
// Sign In / Sign Out
// ============================================================================

/// POST /api/accounts/signin
pub async fn sign_in<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<SignInRequest>,
) -> AccountResult<impl IntoResponse>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = AuthenticateUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(AuthenticateInput {
            identifier: req.identifier,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie_config(&state.config).build_set_cookie(&output.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(SignInResponse {
            account_id: output.account_id.to_string(),
            role: output.role.code().to_string(),
            display_name: output.display_name,
            expires_at: output.expires_at,
        }),
    ))
}

/// POST /api/accounts/signout
pub async fn sign_out<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountResult<impl IntoResponse>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    if let Some(token) = extract_session_cookie(&headers, &state.config) {
        let use_case = SignOutUseCase::new(state.repo.clone(), state.config.clone());
        // The cookie is cleared regardless of the store outcome
        let _ = use_case.execute(&token).await;
    }

    let cookie = session_cookie_config(&state.config).build_delete_cookie();

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/accounts/status
pub async fn session_status<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    headers: HeaderMap,
) -> AccountResult<Json<SessionStatusResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());

    let info = match extract_session_cookie(&headers, &state.config) {
        Some(token) => use_case.execute(&token).await.ok(),
        None => None,
    };

    match info {
        Some(info) => Ok(Json(SessionStatusResponse {
            authenticated: true,
            account_id: Some(info.account_id.to_string()),
            role: Some(info.role.code().to_string()),
            expires_at: Some(info.expires_at),
        })),
        None => Ok(Json(SessionStatusResponse {
            authenticated: false,
            account_id: None,
            role: None,
            expires_at: None,
        })),
    }
}

// ============================================================================
// Profile (requires session)
// ============================================================================

/// GET /api/accounts/profile
pub async fn profile<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(session): Extension<CurrentSession>,
) -> AccountResult<Json<ProfileResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());
    let account = use_case.fetch(&session.account_id).await?;

    Ok(Json(ProfileResponse::from_account(&account)))
}

/// PUT /api/accounts/profile
pub async fn update_profile<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(session): Extension<CurrentSession>,
    Json(req): Json<UpdateProfileRequest>,
) -> AccountResult<Json<ProfileResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = UpdateProfileUseCase::new(state.repo.clone());

    // A session whose account has since been deleted is a 404 here even
    // though the core treats the update itself as a no-op.
    let account = use_case
        .execute(UpdateProfileInput {
            account_id: session.account_id,
            full_name: req.full_name,
            phone_number: req.phone_number,
        })
        .await?
        .ok_or(AccountError::NotFound)?;

    Ok(Json(ProfileResponse::from_account(&account)))
}

// ============================================================================
// Password Reset
// ============================================================================

/// POST /api/accounts/password/forgot
pub async fn forgot_password<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<ForgotPasswordRequest>,
) -> AccountResult<Json<ApiMessage>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = password_reset_use_case(&state);

    // An unknown address gets the same response as a known one, so this
    // endpoint cannot be used to probe which emails are registered.
    match use_case.initiate(req.email).await {
        Ok(()) | Err(AccountError::NotFound) => {}
        Err(err) => return Err(err),
    }

    Ok(Json(ApiMessage::new(
        "If the email is registered, a reset code has been sent.",
    )))
}

/// POST /api/accounts/password/verify-otp
pub async fn verify_otp<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<VerifyOtpRequest>,
) -> AccountResult<Json<ApiMessage>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = password_reset_use_case(&state);
    use_case.verify_otp(req.email, &req.code).await?;

    Ok(Json(ApiMessage::new("Code verified.")))
}

/// POST /api/accounts/password/reset
pub async fn reset_password<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Json(req): Json<ResetPasswordRequest>,
) -> AccountResult<Json<ApiMessage>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = password_reset_use_case(&state);
    use_case
        .reset_with_otp(req.email, &req.code, req.new_password)
        .await?;

    Ok(Json(ApiMessage::new("Password has been reset.")))
}

// ============================================================================
// Admin: User Management
// ============================================================================

/// GET /api/accounts/admin/users
pub async fn list_users<R, M>(
    State(state): State<AccountsAppState<R, M>>,
) -> AccountResult<Json<UserListResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.repo.clone());
    let listing = use_case.list().await?;

    Ok(Json(UserListResponse {
        users: listing.accounts.iter().map(UserSummaryResponse::from).collect(),
        total: listing.total,
        admin_count: listing.admin_count,
        customer_count: listing.customer_count,
    }))
}

/// GET /api/accounts/admin/users/search?q=...
pub async fn search_users<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Query(query): Query<SearchQuery>,
) -> AccountResult<Json<Vec<UserSummaryResponse>>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.repo.clone());
    let results = use_case.search(&query.q).await?;

    Ok(Json(results.iter().map(UserSummaryResponse::from).collect()))
}

/// POST /api/accounts/admin/users/{id}/toggle
pub async fn toggle_user_enabled<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Path(id): Path<uuid::Uuid>,
) -> AccountResult<Json<ToggleEnabledResponse>>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let target = AccountId::from_uuid(id);

    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.repo.clone());
    let enabled = use_case.toggle_enabled(&target).await?;

    Ok(Json(ToggleEnabledResponse {
        account_id: target.to_string(),
        enabled,
    }))
}

/// DELETE /api/accounts/admin/users/{id}
pub async fn delete_user<R, M>(
    State(state): State<AccountsAppState<R, M>>,
    Extension(session): Extension<CurrentSession>,
    Path(id): Path<uuid::Uuid>,
) -> AccountResult<StatusCode>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    let target = AccountId::from_uuid(id);

    let use_case = ManageUsersUseCase::new(state.repo.clone(), state.repo.clone());
    use_case.delete(&session.account_id, &target).await?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn extract_session_cookie(headers: &HeaderMap, config: &AccountsConfig) -> Option<String> {
    platform::cookie::extract_cookie(headers, &config.session_cookie_name)
}

fn session_cookie_config(config: &AccountsConfig) -> CookieConfig {
    CookieConfig {
        name: config.session_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.session_ttl.as_secs() as i64),
    }
}

fn password_reset_use_case<R, M>(
    state: &AccountsAppState<R, M>,
) -> PasswordResetUseCase<R, M>
where
    R: AccountRepository + SessionRepository + Clone + Send + Sync + 'static,
    M: OtpMailer + Send + Sync + 'static,
{
    PasswordResetUseCase::new(
        state.repo.clone(),
        state.otp_store.clone(),
        state.mailer.clone(),
        state.config.clone(),
    )
}
