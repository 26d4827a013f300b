//! One-time password entry.
//!
//! One outstanding reset challenge per email. Expiry is checked lazily at
//! verification time; stale entries are never swept proactively.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpEntry {
    /// Canonical (lowercased) email this code was issued for.
    pub email: String,
    /// Six-digit numeric code.
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OtpEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let entry = OtpEntry {
            email: "user@gmail.com".to_string(),
            code: "123456".to_string(),
            expires_at: now + Duration::minutes(10),
        };

        assert!(!entry.is_expired(now));
        assert!(!entry.is_expired(now + Duration::minutes(10)));
        assert!(entry.is_expired(now + Duration::minutes(10) + Duration::seconds(1)));
    }
}
