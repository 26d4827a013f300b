//! Application configuration for the accounts layer.

use std::time::Duration;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Accounts application configuration.
#[derive(Debug, Clone)]
pub struct AccountsConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Secret key for HMAC-signing session tokens (32 bytes)
    pub session_secret: [u8; 32],
    /// Session lifetime (12 hours)
    pub session_ttl: Duration,
    /// Whether to require the Secure cookie attribute
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// The one address that is registered as an admin. Any other
    /// registration becomes a customer; role assignment is explicit and
    /// logged, never inferred from the address contents.
    pub bootstrap_admin_email: Option<String>,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "bm_session".to_string(),
            session_secret: [0u8; 32],
            session_ttl: Duration::from_secs(12 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            bootstrap_admin_email: None,
        }
    }
}

impl AccountsConfig {
    /// Config with a random session secret (for development).
    pub fn with_random_secret() -> Self {
        use rand::RngCore;
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Development config (insecure cookie, random secret).
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Session TTL as a chrono duration, for expiry arithmetic.
    pub fn session_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl.as_secs() as i64)
    }

    /// Password pepper as a slice.
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }

    /// Whether `email` is the configured bootstrap admin address.
    pub fn is_bootstrap_admin(&self, email: &str) -> bool {
        self.bootstrap_admin_email
            .as_deref()
            .is_some_and(|admin| admin.eq_ignore_ascii_case(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bootstrap_admin_match_is_case_insensitive() {
        let config = AccountsConfig {
            bootstrap_admin_email: Some("owner@gmail.com".to_string()),
            ..AccountsConfig::default()
        };

        assert!(config.is_bootstrap_admin("Owner@Gmail.com"));
        assert!(!config.is_bootstrap_admin("someone@gmail.com"));
    }

    #[test]
    fn test_no_bootstrap_admin_configured() {
        let config = AccountsConfig::default();
        assert!(!config.is_bootstrap_admin("owner@gmail.com"));
    }
}
