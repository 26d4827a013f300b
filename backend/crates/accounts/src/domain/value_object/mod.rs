//! Value objects.
//!
//! Each constructor runs its validation rules in a fixed order and reports
//! the first violated rule; an `Ok` value is valid by construction.

pub mod account_password;
pub mod account_role;
pub mod email;
pub mod full_name;
pub mod ids;
pub mod phone_number;

pub use account_password::{PasswordHash, RawPassword};
pub use account_role::AccountRole;
pub use email::Email;
pub use full_name::FullName;
pub use ids::AccountId;
pub use phone_number::PhoneNumber;
