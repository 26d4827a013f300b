//! Authorization gate.
//!
//! Two middleware layers guard routes: `require_session` for any signed-in
//! account, `require_admin` for admin-only routes. The decision itself is a
//! pure function over the resolved session, so the rules are testable
//! without HTTP plumbing.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::AccountsConfig;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{AccountId, AccountRole};
use crate::error::AccountError;

/// Verified session identity, stored in request extensions for handlers.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session_id: uuid::Uuid,
    pub account_id: AccountId,
    pub role: AccountRole,
}

/// Gate outcome for a guarded route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// No usable session; the client must sign in.
    RequireSignIn,
    /// Signed in, but the route needs an admin.
    Forbid,
}

/// The authorization rules, free of any HTTP machinery.
pub fn evaluate(session: Option<&CurrentSession>, admin_only: bool) -> GateDecision {
    match session {
        None => GateDecision::RequireSignIn,
        Some(s) if admin_only && s.role != AccountRole::Admin => GateDecision::Forbid,
        Some(_) => GateDecision::Allow,
    }
}

/// Middleware state
#[derive(Clone)]
pub struct GateState<S>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    pub sessions: Arc<S>,
    pub config: Arc<AccountsConfig>,
}

/// Middleware that requires a valid session
pub async fn require_session<S>(
    state: GateState<S>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    guard(state, req, next, false).await
}

/// Middleware that requires a valid admin session
pub async fn require_admin<S>(
    state: GateState<S>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    guard(state, req, next, true).await
}

async fn guard<S>(
    state: GateState<S>,
    mut req: Request<Body>,
    next: Next,
    admin_only: bool,
) -> Result<Response, Response>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let session = resolve_session(&state, req.headers()).await;

    match evaluate(session.as_ref(), admin_only) {
        GateDecision::Allow => {
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            Ok(next.run(req).await)
        }
        GateDecision::RequireSignIn => Err((
            StatusCode::UNAUTHORIZED,
            [("X-Auth-Required", "true")],
        )
            .into_response()),
        GateDecision::Forbid => Err(AccountError::AccessDenied.into_response()),
    }
}

async fn resolve_session<S>(
    state: &GateState<S>,
    headers: &axum::http::HeaderMap,
) -> Option<CurrentSession>
where
    S: SessionRepository + Clone + Send + Sync + 'static,
{
    let token = platform::cookie::extract_cookie(headers, &state.config.session_cookie_name)?;

    let use_case = CheckSessionUseCase::new(state.sessions.clone(), state.config.clone());
    let info = use_case.execute(&token).await.ok()?;

    Some(CurrentSession {
        session_id: info.session_id,
        account_id: info.account_id,
        role: info.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: AccountRole) -> CurrentSession {
        CurrentSession {
            session_id: uuid::Uuid::new_v4(),
            account_id: AccountId::new(),
            role,
        }
    }

    #[test]
    fn test_no_session_requires_sign_in() {
        assert_eq!(evaluate(None, false), GateDecision::RequireSignIn);
        assert_eq!(evaluate(None, true), GateDecision::RequireSignIn);
    }

    #[test]
    fn test_customer_blocked_from_admin_routes() {
        let s = session(AccountRole::Customer);
        assert_eq!(evaluate(Some(&s), false), GateDecision::Allow);
        assert_eq!(evaluate(Some(&s), true), GateDecision::Forbid);
    }

    #[test]
    fn test_admin_passes_both_gates() {
        let s = session(AccountRole::Admin);
        assert_eq!(evaluate(Some(&s), false), GateDecision::Allow);
        assert_eq!(evaluate(Some(&s), true), GateDecision::Allow);
    }
}
