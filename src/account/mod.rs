//! Account registry
//!
//! Account records carry identity, owning user, currency and lifecycle
//! status. Balance is NOT a field here: it is always derived from the
//! ledger (see [`crate::ledger::balance`]). The transfer engine consults
//! this module, it does not own it.

pub mod models;
pub mod registry;

pub use models::{Account, AccountStatus};
pub use registry::{AccountRegistry, PgAccountRegistry};
