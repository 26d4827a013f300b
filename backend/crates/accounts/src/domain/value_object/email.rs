//! Email value object.
//!
//! Rules run in order; the first violation is reported:
//! 1. required (non-empty after trimming)
//! 2. no spaces
//! 3. address grammar (local part, domain, TLD)
//! 4. deployment rule: only Gmail addresses are accepted

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AccountError, AccountResult};

static EMAIL_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email regex is valid")
});

/// Permitted domain suffix. A deployment decision, not general validation.
const REQUIRED_DOMAIN_SUFFIX: &str = "@gmail.com";

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> AccountResult<Self> {
        let email = email.into().trim().to_string();

        if email.is_empty() {
            return Err(AccountError::Validation("Email is required.".to_string()));
        }

        if email.contains(' ') {
            return Err(AccountError::Validation(
                "Email must not contain spaces.".to_string(),
            ));
        }

        if !EMAIL_FORMAT.is_match(&email) {
            return Err(AccountError::Validation(
                "Please enter a valid email address format.".to_string(),
            ));
        }

        if !email.to_lowercase().ends_with(REQUIRED_DOMAIN_SUFFIX) {
            return Err(AccountError::Validation(
                "Email must be a Gmail address (ending with @gmail.com).".to_string(),
            ));
        }

        Ok(Self(email))
    }

    /// Reconstruct from storage without re-validating.
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical form used as a map key (OTP store).
    pub fn canonical(&self) -> String {
        self.0.to_lowercase()
    }

    /// Case-insensitive comparison, for configuration matches.
    pub fn matches_ignore_case(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }
}

impl FromStr for Email {
    type Err = AccountError;

    fn from_str(s: &str) -> AccountResult<Self> {
        Email::new(s)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(input: &str) -> String {
        match Email::new(input) {
            Err(AccountError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_accepts_gmail_address() {
        assert!(Email::new("user@gmail.com").is_ok());
        assert!(Email::new("user.name+tag@gmail.com").is_ok());
        assert!(Email::new("User@Gmail.COM").is_ok()); // suffix check is case-insensitive
    }

    #[test]
    fn test_rejects_in_rule_order() {
        assert_eq!(message(""), "Email is required.");
        assert_eq!(message("   "), "Email is required.");
        assert_eq!(message("user name@gmail.com"), "Email must not contain spaces.");
        assert_eq!(
            message("not-an-email"),
            "Please enter a valid email address format."
        );
        assert_eq!(
            message("user@@gmail.com"),
            "Please enter a valid email address format."
        );
        assert_eq!(
            message("user@yahoo.com"),
            "Email must be a Gmail address (ending with @gmail.com)."
        );
    }

    #[test]
    fn test_canonical_is_lowercase() {
        let email = Email::new("User@Gmail.com").unwrap();
        assert_eq!(email.canonical(), "user@gmail.com");
        // the original casing is preserved on the value itself
        assert_eq!(email.as_str(), "User@Gmail.com");
    }

    #[test]
    fn test_matches_ignore_case() {
        let email = Email::new("owner@gmail.com").unwrap();
        assert!(email.matches_ignore_case("Owner@Gmail.com"));
        assert!(!email.matches_ignore_case("other@gmail.com"));
    }
}
