//! Application layer.
//!
//! Use cases and application services.

pub mod authenticate;
pub mod check_session;
pub mod config;
pub mod manage_users;
pub mod password_reset;
pub mod register;
pub mod sign_out;
pub mod token;
pub mod update_profile;

// Re-exports
pub use authenticate::{AuthenticateInput, AuthenticateOutput, AuthenticateUseCase};
pub use check_session::{CheckSessionUseCase, SessionInfoOutput};
pub use config::AccountsConfig;
pub use manage_users::{AccountSummary, ManageUsersUseCase, UserListing};
pub use password_reset::PasswordResetUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use sign_out::SignOutUseCase;
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};
