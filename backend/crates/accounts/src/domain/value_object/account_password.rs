//! Account password value objects.
//!
//! [`RawPassword`] enforces the composition policy; hashing and verification
//! delegate to `platform::password` (Argon2id). The rules run in a fixed
//! order and the first violation is what the user sees:
//! 1. required
//! 2. minimum length 8
//! 3. at least one uppercase letter
//! 4. at least one lowercase letter
//! 5. at least one digit
//! 6. at least one special character from the fixed set
//! 7. no spaces

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::{AccountError, AccountResult};

const MIN_LENGTH: usize = 8;
const SPECIAL_CHARS: &str = "!@#$%&*()-+=^";

/// Cleartext password that passed the composition policy.
///
/// Memory is zeroized when dropped (via the platform wrapper).
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: impl Into<String>) -> AccountResult<Self> {
        let raw = raw.into();

        if raw.trim().is_empty() {
            return Err(validation("Password is required."));
        }

        if raw.chars().count() < MIN_LENGTH {
            return Err(validation(
                "Password must be at least 8 characters long.",
            ));
        }

        if !raw.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(validation(
                "Password must contain at least one uppercase letter (A-Z).",
            ));
        }

        if !raw.chars().any(|c| c.is_ascii_lowercase()) {
            return Err(validation(
                "Password must contain at least one lowercase letter (a-z).",
            ));
        }

        if !raw.chars().any(|c| c.is_ascii_digit()) {
            return Err(validation(
                "Password must contain at least one digit (0-9).",
            ));
        }

        if !raw.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            return Err(validation(
                "Password must contain at least one special character (!@#$%&*()-+=^).",
            ));
        }

        if raw.contains(' ') {
            return Err(validation("Password must not contain any spaces."));
        }

        Ok(Self(ClearTextPassword::new(raw)))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

fn validation(msg: &str) -> AccountError {
    AccountError::Validation(msg.to_string())
}

/// Hashed password for storage, always the hasher's output.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(HashedPassword);

impl PasswordHash {
    /// Hash a validated raw password.
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AccountResult<Self> {
        let hashed = raw.inner().hash(pepper)?;
        Ok(Self(hashed))
    }

    /// Reconstruct from a PHC string loaded from the database.
    pub fn from_phc_string(phc: impl Into<String>) -> AccountResult<Self> {
        let hashed = HashedPassword::from_phc_string(phc)
            .map_err(|_| AccountError::Internal("Invalid password hash in database".to_string()))?;
        Ok(Self(hashed))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Verify a candidate password. Constant-time at the hash level.
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }

    /// Verify an unvalidated candidate, for the sign-in path. Composition
    /// rules are not checked there: a candidate that violates them simply
    /// cannot match any stored hash.
    pub fn verify_candidate(&self, candidate: &ClearTextPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(candidate, pepper)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PasswordHash").field(&"[HASH]").finish()
    }
}
