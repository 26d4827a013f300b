//! Full name value object. Required, 2 to 50 characters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccountError, AccountResult};

const MIN_LENGTH: usize = 2;
const MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullName(String);

impl FullName {
    pub fn new(name: impl Into<String>) -> AccountResult<Self> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(AccountError::Validation(
                "Full name is required.".to_string(),
            ));
        }

        let length = name.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(AccountError::Validation(
                "Full name must be between 2 and 50 characters.".to_string(),
            ));
        }

        Ok(Self(name))
    }

    /// Reconstruct from storage without re-validating.
    pub fn from_db(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(FullName::new("Jo").is_ok());
        assert!(FullName::new("Amaya Perera").is_ok());
        assert!(FullName::new("x".repeat(50)).is_ok());
    }

    #[test]
    fn test_required() {
        match FullName::new("   ") {
            Err(AccountError::Validation(msg)) => assert_eq!(msg, "Full name is required."),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_length_bounds() {
        assert!(FullName::new("A").is_err());
        assert!(FullName::new("x".repeat(51)).is_err());
    }
}
