//! Account role tag.
//!
//! Fixed at creation; no operation in this crate changes an account's role.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    Admin,
    #[default]
    Customer,
}

impl AccountRole {
    /// Storage discriminator.
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            AccountRole::Admin => "ADMIN",
            AccountRole::Customer => "CUSTOMER",
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "ADMIN" => Some(AccountRole::Admin),
            "CUSTOMER" => Some(AccountRole::Customer),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, AccountRole::Admin)
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        assert_eq!(AccountRole::from_code("ADMIN"), Some(AccountRole::Admin));
        assert_eq!(
            AccountRole::from_code("CUSTOMER"),
            Some(AccountRole::Customer)
        );
        assert_eq!(AccountRole::from_code("SUPERUSER"), None);
    }

    #[test]
    fn test_is_admin() {
        assert!(AccountRole::Admin.is_admin());
        assert!(!AccountRole::Customer.is_admin());
    }
}
