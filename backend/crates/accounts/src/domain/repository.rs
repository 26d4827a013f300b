//! Repository traits.
//!
//! Persistence interfaces consumed by the application layer; the Postgres
//! implementations live in the infrastructure layer. Uniqueness of
//! `username` and `email` is enforced by the store: concurrent duplicate
//! registrations are resolved there, not by the service.

use uuid::Uuid;

use crate::domain::entity::{account::Account, session::Session};
use crate::domain::value_object::{AccountId, Email};
use crate::error::AccountResult;

/// Credential store for accounts.
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account. Yields `EmailTaken` when the unique constraint
    /// on email/username rejects the row.
    async fn create(&self, account: &Account) -> AccountResult<()>;

    /// Persist changes to an existing account.
    async fn update(&self, account: &Account) -> AccountResult<()>;

    async fn find_by_id(&self, account_id: &AccountId) -> AccountResult<Option<Account>>;

    async fn find_by_email(&self, email: &Email) -> AccountResult<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> AccountResult<Option<Account>>;

    async fn find_all(&self) -> AccountResult<Vec<Account>>;

    async fn delete_by_id(&self, account_id: &AccountId) -> AccountResult<()>;
}

/// Store for server-side login sessions.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    async fn create(&self, session: &Session) -> AccountResult<()>;

    async fn find_by_id(&self, session_id: Uuid) -> AccountResult<Option<Session>>;

    async fn delete(&self, session_id: Uuid) -> AccountResult<()>;

    /// Delete every session belonging to an account (on deletion/disable).
    async fn delete_all_for_account(&self, account_id: &AccountId) -> AccountResult<u64>;

    /// Remove expired rows; returns how many were deleted.
    async fn cleanup_expired(&self) -> AccountResult<u64>;
}
