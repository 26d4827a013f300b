//! Shared kernel for the bookstore backend.
//!
//! Holds the smallest cross-crate vocabulary: the unified error type with
//! its HTTP mapping, and typed entity IDs. Anything domain-specific lives in
//! the `accounts` crate; only concepts whose meaning is identical everywhere
//! belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
