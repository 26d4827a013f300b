//! Session entity.
//!
//! An explicit record of `{account_id, role}` rather than a reference to a
//! polymorphic account object, so authorization is a plain equality check.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::domain::value_object::{AccountId, AccountRole};

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: Uuid,
    pub account_id: AccountId,
    /// Captured at sign-in; roles are immutable so this cannot go stale.
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(account_id: AccountId, role: AccountRole, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            account_id,
            role,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
