//! Process-local OTP registry.
//!
//! Instance-scoped (injected into the reset use case, never a global) and
//! concurrent-safe: issue/lookup/consume on distinct keys are independent,
//! and consume on one key is atomic, so at most one concurrent verification
//! can win a given live entry.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;

use crate::domain::entity::otp::OtpEntry;
use crate::domain::value_object::Email;

/// Codes are valid for ten minutes from issuance.
pub const OTP_TTL_MINUTES: i64 = 10;

/// Time source, injectable so expiry is testable without sleeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Time-bounded, single-use code registry keyed by canonical email.
pub struct OtpStore {
    entries: DashMap<String, OtpEntry>,
    clock: Arc<dyn Clock>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Issue a fresh code for `email`, replacing any outstanding entry.
    pub fn issue(&self, email: &Email) -> OtpEntry {
        let entry = OtpEntry {
            email: email.canonical(),
            code: generate_code(),
            expires_at: self.clock.now() + Duration::minutes(OTP_TTL_MINUTES),
        };
        self.entries.insert(entry.email.clone(), entry.clone());
        entry
    }

    /// Verify and consume in one step.
    ///
    /// Returns true iff a live entry exists for `email` and `code` matches
    /// exactly; the entry is removed on success. On failure any entry stays
    /// put, so the user may retry until expiry.
    pub fn consume(&self, email: &Email, code: &str) -> bool {
        let now = self.clock.now();
        self.entries
            .remove_if(&email.canonical(), |_, entry| {
                !entry.is_expired(now) && entry.code == code
            })
            .is_some()
    }
}

impl Default for OtpStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Uniform random six-digit code.
fn generate_code() -> String {
    rand::rng().random_range(100_000..=999_999).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test clock that only moves when told to.
    pub struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        pub fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(Utc::now())))
        }

        pub fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn email() -> Email {
        Email::new("user@gmail.com").unwrap()
    }

    #[test]
    fn test_code_format() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let value: u32 = code.parse().unwrap();
            assert!((100_000..=999_999).contains(&value));
        }
    }

    #[test]
    fn test_consume_is_single_use() {
        let store = OtpStore::new();
        let entry = store.issue(&email());

        assert!(store.consume(&email(), &entry.code));
        assert!(!store.consume(&email(), &entry.code));
    }

    #[test]
    fn test_wrong_code_leaves_entry_intact() {
        let store = OtpStore::new();
        let entry = store.issue(&email());

        assert!(!store.consume(&email(), "000000"));
        // retry with the right code still works
        assert!(store.consume(&email(), &entry.code));
    }

    #[test]
    fn test_expired_code_is_rejected() {
        let clock = ManualClock::new();
        let store = OtpStore::with_clock(clock.clone());
        let entry = store.issue(&email());

        clock.advance(Duration::minutes(OTP_TTL_MINUTES) + Duration::seconds(1));
        assert!(!store.consume(&email(), &entry.code));
    }

    #[test]
    fn test_reissue_overwrites_prior_entry() {
        let store = OtpStore::new();
        let first = store.issue(&email());
        let second = store.issue(&email());

        if first.code != second.code {
            assert!(!store.consume(&email(), &first.code));
        }
        assert!(store.consume(&email(), &second.code));
    }

    #[test]
    fn test_entries_are_keyed_per_email() {
        let store = OtpStore::new();
        let a = Email::new("a@gmail.com").unwrap();
        let b = Email::new("b@gmail.com").unwrap();

        let entry_a = store.issue(&a);
        let entry_b = store.issue(&b);

        assert!(!store.consume(&b, &entry_a.code) || entry_a.code == entry_b.code);
        assert!(store.consume(&a, &entry_a.code));
    }

    #[test]
    fn test_email_key_is_case_insensitive() {
        let store = OtpStore::new();
        let entry = store.issue(&Email::new("User@Gmail.com").unwrap());
        assert!(store.consume(&Email::new("user@gmail.com").unwrap(), &entry.code));
    }

    #[test]
    fn test_at_most_one_concurrent_consume_wins() {
        let store = Arc::new(OtpStore::new());
        let entry = store.issue(&email());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let code = entry.code.clone();
            handles.push(std::thread::spawn(move || {
                store.consume(&Email::new("user@gmail.com").unwrap(), &code)
            }));
        }

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(wins, 1);
    }
}
