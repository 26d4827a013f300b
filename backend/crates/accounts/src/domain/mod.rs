//! Domain layer.
//!
//! Entities, value objects, repository traits, and the OTP store.

pub mod entity;
pub mod otp_store;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{account::Account, otp::OtpEntry, session::Session};
pub use otp_store::{Clock, OtpStore, SystemClock};
pub use repository::{AccountRepository, SessionRepository};
