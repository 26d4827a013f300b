//! Registration use case.
//!
//! Validates input in a fixed order (full name, email, password, phone),
//! rejects duplicate emails, and persists a new account with the role the
//! caller decided on. The service never infers a role itself.

use std::sync::Arc;

use crate::application::config::AccountsConfig;
use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    AccountId, AccountRole, Email, FullName, PasswordHash, PhoneNumber, RawPassword,
};
use crate::error::{AccountError, AccountResult};

/// Registration input
pub struct RegisterInput {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    /// Decided by the caller (bootstrap-admin policy lives at the edge).
    pub role: AccountRole,
}

/// Registration output
#[derive(Debug)]
pub struct RegisterOutput {
    pub account_id: AccountId,
    pub role: AccountRole,
}

/// Registration use case
pub struct RegisterUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
    config: Arc<AccountsConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AccountsConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AccountResult<RegisterOutput> {
        // Validation order is observable: the first failing rule is what
        // the user sees.
        let full_name = FullName::new(input.full_name)?;
        let email = Email::new(input.email)?;
        let raw_password = RawPassword::new(input.password)?;
        let phone_number = PhoneNumber::new(input.phone_number)?;

        if self.repo.find_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken);
        }

        let password_hash = PasswordHash::from_raw(&raw_password, self.config.pepper())?;

        let account = match input.role {
            AccountRole::Customer => {
                Account::new_customer(email, password_hash, full_name, phone_number)
            }
            AccountRole::Admin => Account::new_admin(email, password_hash),
        };

        // The pre-check above races with concurrent registrations; the
        // store's unique constraint is the real arbiter and surfaces as
        // EmailTaken from `create`.
        self.repo.create(&account).await?;

        tracing::info!(
            account_id = %account.account_id,
            email = %account.email,
            role = %account.role(),
            "Account registered"
        );

        Ok(RegisterOutput {
            account_id: account.account_id,
            role: account.role(),
        })
    }
}
