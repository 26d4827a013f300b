//! Typed IDs for accounts-domain entities.

use kernel::id::{Id, markers};

/// Account identifier, assigned at construction and immutable thereafter.
pub type AccountId = Id<markers::Account>;
