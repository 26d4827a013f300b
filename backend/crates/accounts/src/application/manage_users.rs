//! Admin account management.
//!
//! Listing, search, enable/disable, and deletion. These run behind the
//! admin gate; the use case still owns the one rule the gate cannot see,
//! namely that an admin may not delete their own account.

use std::sync::Arc;

use crate::domain::entity::account::Account;
use crate::domain::repository::{AccountRepository, SessionRepository};
use crate::domain::value_object::{AccountId, AccountRole};
use crate::error::{AccountError, AccountResult};

/// One row in the admin user listing.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account_id: AccountId,
    pub display_name: String,
    pub email: String,
    pub username: String,
    pub role: AccountRole,
    pub enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.account_id,
            display_name: account.display_name().to_string(),
            email: account.email.as_str().to_string(),
            username: account.username.clone(),
            role: account.role(),
            enabled: account.enabled,
            created_at: account.created_at,
        }
    }
}

/// Listing with per-role counts for the dashboard header.
#[derive(Debug, Clone)]
pub struct UserListing {
    pub accounts: Vec<AccountSummary>,
    pub total: usize,
    pub admin_count: usize,
    pub customer_count: usize,
}

/// Account management use case
pub struct ManageUsersUseCase<R, S>
where
    R: AccountRepository,
    S: SessionRepository,
{
    accounts: Arc<R>,
    sessions: Arc<S>,
}

impl<R, S> ManageUsersUseCase<R, S>
where
    R: AccountRepository,
    S: SessionRepository,
{
    pub fn new(accounts: Arc<R>, sessions: Arc<S>) -> Self {
        Self { accounts, sessions }
    }

    pub async fn list(&self) -> AccountResult<UserListing> {
        let accounts = self.accounts.find_all().await?;

        let admin_count = accounts
            .iter()
            .filter(|a| a.role() == AccountRole::Admin)
            .count();

        Ok(UserListing {
            total: accounts.len(),
            admin_count,
            customer_count: accounts.len() - admin_count,
            accounts: accounts.iter().map(AccountSummary::from).collect(),
        })
    }

    /// Case-insensitive substring search over name, email and username.
    pub async fn search(&self, query: &str) -> AccountResult<Vec<AccountSummary>> {
        let needle = query.trim().to_lowercase();
        let accounts = self.accounts.find_all().await?;

        Ok(accounts
            .iter()
            .filter(|a| {
                needle.is_empty()
                    || a.display_name().to_lowercase().contains(&needle)
                    || a.email.as_str().to_lowercase().contains(&needle)
                    || a.username.to_lowercase().contains(&needle)
            })
            .map(AccountSummary::from)
            .collect())
    }

    /// Flip an account's enabled flag. Disabling also revokes the account's
    /// live sessions so the block takes effect immediately.
    pub async fn toggle_enabled(&self, target: &AccountId) -> AccountResult<bool> {
        let Some(mut account) = self.accounts.find_by_id(target).await? else {
            return Err(AccountError::NotFound);
        };

        let enabled = account.toggle_enabled();
        self.accounts.update(&account).await?;

        if !enabled {
            let revoked = self.sessions.delete_all_for_account(target).await?;
            tracing::info!(account_id = %target, revoked, "Account disabled");
        } else {
            tracing::info!(account_id = %target, "Account enabled");
        }

        Ok(enabled)
    }

    /// Delete an account and its sessions. `actor` is the admin performing
    /// the deletion; deleting oneself is refused.
    pub async fn delete(&self, actor: &AccountId, target: &AccountId) -> AccountResult<()> {
        if actor == target {
            return Err(AccountError::CannotDeleteSelf);
        }

        if self.accounts.find_by_id(target).await?.is_none() {
            return Err(AccountError::NotFound);
        }

        self.sessions.delete_all_for_account(target).await?;
        self.accounts.delete_by_id(target).await?;

        tracing::info!(account_id = %target, by = %actor, "Account deleted");
        Ok(())
    }
}
