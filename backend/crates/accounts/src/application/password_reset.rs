//! Password reset flow.
//!
//! Three steps share one use case: issue a code to a known email, verify a
//! code (single-use), and set a new password. A combined step backs the
//! reset form that submits code and new password together.

use std::sync::Arc;

use platform::mailer::OtpMailer;

use crate::application::config::AccountsConfig;
use crate::domain::otp_store::OtpStore;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{Email, PasswordHash, RawPassword};
use crate::error::{AccountError, AccountResult};

/// Password reset use case
pub struct PasswordResetUseCase<R, M>
where
    R: AccountRepository,
    M: OtpMailer,
{
    accounts: Arc<R>,
    otp_store: Arc<OtpStore>,
    mailer: Arc<M>,
    config: Arc<AccountsConfig>,
}

impl<R, M> PasswordResetUseCase<R, M>
where
    R: AccountRepository,
    M: OtpMailer,
{
    pub fn new(
        accounts: Arc<R>,
        otp_store: Arc<OtpStore>,
        mailer: Arc<M>,
        config: Arc<AccountsConfig>,
    ) -> Self {
        Self {
            accounts,
            otp_store,
            mailer,
            config,
        }
    }

    /// Issue a reset code for a registered email and hand it to the mailer.
    ///
    /// `NotFound` for an unknown address; the HTTP layer flattens that into
    /// a generic response so the endpoint cannot be used to probe for
    /// accounts.
    pub async fn initiate(&self, email: impl Into<String>) -> AccountResult<()> {
        let email = Email::new(email)?;

        if self.accounts.find_by_email(&email).await?.is_none() {
            return Err(AccountError::NotFound);
        }

        let entry = self.otp_store.issue(&email);
        self.mailer.send_otp(email.as_str(), &entry.code).await;

        tracing::info!(email = %email, "Password reset initiated");
        Ok(())
    }

    /// Verify a code without touching the password. Consumes it on success.
    pub async fn verify_otp(&self, email: impl Into<String>, code: &str) -> AccountResult<()> {
        let email = Email::new(email)?;

        if !self.otp_store.consume(&email, code) {
            return Err(AccountError::OtpInvalid);
        }
        Ok(())
    }

    /// Set a new password for an already-verified email.
    pub async fn reset_password(
        &self,
        email: impl Into<String>,
        new_password: impl Into<String>,
    ) -> AccountResult<()> {
        let email = Email::new(email)?;
        let raw = RawPassword::new(new_password)?;

        self.apply_new_password(&email, &raw).await
    }

    /// Verify the code and set the new password in one step.
    ///
    /// The new password is validated before the code is consumed, so a
    /// rejected password never burns the single-use code.
    pub async fn reset_with_otp(
        &self,
        email: impl Into<String>,
        code: &str,
        new_password: impl Into<String>,
    ) -> AccountResult<()> {
        let email = Email::new(email)?;
        let raw = RawPassword::new(new_password)?;

        if !self.otp_store.consume(&email, code) {
            return Err(AccountError::OtpInvalid);
        }

        self.apply_new_password(&email, &raw).await
    }

    async fn apply_new_password(&self, email: &Email, raw: &RawPassword) -> AccountResult<()> {
        let Some(mut account) = self.accounts.find_by_email(email).await? else {
            return Err(AccountError::NotFound);
        };

        let hash = PasswordHash::from_raw(raw, self.config.pepper())?;
        account.set_password(hash);
        self.accounts.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Password reset completed");
        Ok(())
    }
}
