//! Phone number value object.
//!
//! Accepts Sri Lankan mobile numbers in three shapes (after stripping
//! spaces and dashes): `+94` plus nine digits, a leading zero plus nine
//! digits, or ten bare digits.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AccountError, AccountResult};

static PHONE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\+94[0-9]{9}$|^0[0-9]{9}$|^[0-9]{10}$").expect("phone regex is valid")
});

/// Validated phone number, stored as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(phone: impl Into<String>) -> AccountResult<Self> {
        let phone = phone.into();

        if phone.trim().is_empty() {
            return Err(AccountError::Validation(
                "Phone number is required.".to_string(),
            ));
        }

        let cleaned: String = phone.chars().filter(|c| *c != ' ' && *c != '-').collect();
        if !PHONE_FORMAT.is_match(&cleaned) {
            return Err(AccountError::Validation(
                "Phone number must be a valid Sri Lankan mobile number (10 digits, starting with 0 or +94)."
                    .to_string(),
            ));
        }

        Ok(Self(phone))
    }

    /// Reconstruct from storage without re-validating.
    pub fn from_db(phone: impl Into<String>) -> Self {
        Self(phone.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_shapes() {
        assert!(PhoneNumber::new("0712345678").is_ok());
        assert!(PhoneNumber::new("+94712345678").is_ok());
        assert!(PhoneNumber::new("0771234567").is_ok());
        // spaces and dashes are stripped before matching
        assert!(PhoneNumber::new("071-234 5678").is_ok());
    }

    #[test]
    fn test_rejected_shapes() {
        assert!(PhoneNumber::new("12345").is_err());
        assert!(PhoneNumber::new("+4412345678901").is_err());
        assert!(PhoneNumber::new("07123456789012").is_err());
        assert!(PhoneNumber::new("071234567a").is_err());
    }

    #[test]
    fn test_required_rule_first() {
        match PhoneNumber::new("  ") {
            Err(AccountError::Validation(msg)) => assert_eq!(msg, "Phone number is required."),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_original_formatting_preserved() {
        let phone = PhoneNumber::new("071-234 5678").unwrap();
        assert_eq!(phone.as_str(), "071-234 5678");
    }
}
