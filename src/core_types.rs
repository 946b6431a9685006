//! Core types used throughout the system
//!
//! Fundamental type aliases shared by all modules. They carry semantic
//! meaning and keep signatures honest about what an `i64` actually is.

/// Account ID - database identity of a ledger account.
///
/// # Constraints:
/// - **Immutable**: Once assigned, NEVER changes
/// - **Never recycled**: Accounts are soft-closed, not deleted
pub type AccountId = i64;

/// User ID - identity of the human (or system principal) owning accounts.
pub type UserId = i64;

/// Ledger entry ID - assigned by the store on append.
pub type EntryId = i64;

/// Monetary amount in whole minor currency units (cents, paise, ...).
///
/// Amounts are never floating point. Ledger entries store strictly
/// positive amounts; a derived balance may be any integer.
pub type Amount = i64;
