//! Infrastructure layer.
//!
//! Database implementations and external service integrations.

pub mod postgres;

pub use postgres::PgAccountRepository;
