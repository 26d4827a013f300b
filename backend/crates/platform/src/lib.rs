//! Platform crate - technical infrastructure.
//!
//! Shared technical foundations with no domain knowledge:
//! - Password hashing (Argon2id, PHC strings, optional pepper)
//! - Cookie construction and extraction
//! - Outbound one-time-code delivery ([`mailer`])

pub mod cookie;
pub mod mailer;
pub mod password;
