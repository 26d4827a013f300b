//! Entity module.

pub mod account;
pub mod otp;
pub mod session;

pub use account::{Account, AdminProfile, CustomerProfile, RoleProfile};
pub use otp::OtpEntry;
pub use session::Session;
