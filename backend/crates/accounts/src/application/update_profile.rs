//! Profile read/update use case.

use std::sync::Arc;

use crate::domain::entity::account::Account;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{AccountId, FullName, PhoneNumber};
use crate::error::{AccountError, AccountResult};

/// Profile update input
pub struct UpdateProfileInput {
    pub account_id: AccountId,
    pub full_name: String,
    pub phone_number: String,
}

/// Profile use case
pub struct UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    accounts: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(accounts: Arc<R>) -> Self {
        Self { accounts }
    }

    /// Load the account behind a session, for the profile page.
    pub async fn fetch(&self, account_id: &AccountId) -> AccountResult<Account> {
        self.accounts
            .find_by_id(account_id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    /// Validate and apply new profile fields, returning the updated account.
    ///
    /// Validation runs before the lookup, so a bad field is reported even
    /// for a stale session. Name is checked before phone. A missing account
    /// is a no-op (`Ok(None)`); whether that is an error is the caller's
    /// call.
    pub async fn execute(&self, input: UpdateProfileInput) -> AccountResult<Option<Account>> {
        let full_name = FullName::new(input.full_name)?;
        let phone_number = PhoneNumber::new(input.phone_number)?;

        let Some(mut account) = self.accounts.find_by_id(&input.account_id).await? else {
            return Ok(None);
        };

        account.update_profile(full_name, phone_number);
        self.accounts.update(&account).await?;

        tracing::info!(account_id = %account.account_id, "Profile updated");

        Ok(Some(account))
    }
}
