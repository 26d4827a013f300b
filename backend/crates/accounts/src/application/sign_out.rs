//! Sign-out use case.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::application::token::parse_session_token;
use crate::domain::repository::SessionRepository;
use crate::error::AccountResult;

/// Sign-out use case
pub struct SignOutUseCase<S>
where
    S: SessionRepository,
{
    sessions: Arc<S>,
    config: Arc<AccountsConfig>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(sessions: Arc<S>, config: Arc<AccountsConfig>) -> Self {
        Self { sessions, config }
    }

    /// Delete the session named by the token. Idempotent: an invalid or
    /// already-deleted token is not an error, the outcome is the same.
    pub async fn execute(&self, token: &str) -> AccountResult<()> {
        if let Ok(session_id) = parse_session_token(token, &self.config.session_secret) {
            self.sessions.delete(session_id).await?;
            tracing::info!(%session_id, "Signed out");
        }
        Ok(())
    }
}
