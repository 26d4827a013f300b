//! Sign-in use case.
//!
//! Looks the account up by email or username, verifies the password, and
//! mints a server-side session with a signed cookie token. Unknown
//! identifier and wrong password collapse into the same error so the
//! response never reveals whether an account exists.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AccountsConfig;
use crate::application::token::sign_session_token;
use crate::domain::entity::{account::Account, session::Session};
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, AccountRole};
use crate::error::{AccountError, AccountResult};

/// Sign-in input
pub struct AuthenticateInput {
    /// Email address or username. Usernames mirror emails at registration,
    /// but the lookup accepts either spelling.
    pub identifier: String,
    pub password: String,
}

/// Sign-in output
pub struct AuthenticateOutput {
    /// Cookie-ready signed session token.
    pub token: String,
    pub account_id: AccountId,
    pub role: AccountRole,
    pub display_name: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

/// Sign-in use case
pub struct AuthenticateUseCase<R, S>
where
    R: AccountRepository,
    S: SessionRepository,
{
    accounts: Arc<R>,
    sessions: Arc<S>,
    config: Arc<AccountsConfig>,
}

impl<R, S> AuthenticateUseCase<R, S>
where
    R: AccountRepository,
    S: SessionRepository,
{
    pub fn new(accounts: Arc<R>, sessions: Arc<S>, config: Arc<AccountsConfig>) -> Self {
        Self {
            accounts,
            sessions,
            config,
        }
    }

    pub async fn execute(&self, input: AuthenticateInput) -> AccountResult<AuthenticateOutput> {
        let identifier = input.identifier.trim();

        if identifier.is_empty() {
            return Err(AccountError::Validation(
                "Username or email is required.".to_string(),
            ));
        }

        let account = self.find_account(identifier).await?;

        let candidate = ClearTextPassword::new(input.password);

        let Some(account) = account else {
            return Err(AccountError::InvalidCredentials);
        };

        if !account
            .password_hash
            .verify_candidate(&candidate, self.config.pepper())
        {
            tracing::warn!(account_id = %account.account_id, "Sign-in with wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        // Checked after the password so a disabled response never doubles as
        // an account-existence oracle.
        if !account.can_sign_in() {
            tracing::warn!(account_id = %account.account_id, "Sign-in on disabled account");
            return Err(AccountError::AccountDisabled);
        }

        let session = Session::new(
            account.account_id,
            account.role(),
            self.config.session_ttl_chrono(),
        );
        self.sessions.create(&session).await?;

        let token = sign_session_token(session.session_id, &self.config.session_secret);

        tracing::info!(
            account_id = %account.account_id,
            session_id = %session.session_id,
            role = %account.role(),
            "Signed in"
        );

        Ok(AuthenticateOutput {
            token,
            account_id: account.account_id,
            role: account.role(),
            display_name: account.display_name().to_string(),
            expires_at: session.expires_at,
        })
    }

    async fn find_account(&self, identifier: &str) -> AccountResult<Option<Account>> {
        if identifier.contains('@') {
            match identifier.parse() {
                Ok(email) => self.accounts.find_by_email(&email).await,
                // Malformed email cannot belong to any account.
                Err(_) => Ok(None),
            }
        } else {
            self.accounts.find_by_username(identifier).await
        }
    }
}
