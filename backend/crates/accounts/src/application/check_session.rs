//! Session resolution.
//!
//! Turns a raw cookie token into a verified, unexpired session. Expired
//! rows are reaped lazily here; a periodic sweep at startup handles the
//! rest.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::token::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::{AccountId, AccountRole};
use crate::error::{AccountError, AccountResult};

/// A verified session, as seen by the authorization gate.
#[derive(Debug, Clone)]
pub struct SessionInfoOutput {
    pub session_id: uuid::Uuid,
    pub account_id: AccountId,
    pub role: AccountRole,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Session check use case
pub struct CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    sessions: Arc<S>,
    config: Arc<AccountsConfig>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(sessions: Arc<S>, config: Arc<AccountsConfig>) -> Self {
        Self { sessions, config }
    }

    /// Resolve a cookie token to a live session.
    ///
    /// Bad signature, unknown ID, and expiry all yield `SessionInvalid`;
    /// callers have no reason to distinguish them.
    pub async fn execute(&self, token: &str) -> AccountResult<SessionInfoOutput> {
        let session_id = parse_session_token(token, &self.config.session_secret)?;

        let Some(session) = self.sessions.find_by_id(session_id).await? else {
            return Err(AccountError::SessionInvalid);
        };

        if session.is_expired() {
            self.sessions.delete(session.session_id).await?;
            tracing::debug!(session_id = %session.session_id, "Expired session reaped");
            return Err(AccountError::SessionInvalid);
        }

        Ok(SessionInfoOutput {
            session_id: session.session_id,
            account_id: session.account_id,
            role: session.role,
            expires_at: session.expires_at,
        })
    }
}
