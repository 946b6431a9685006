//! Double-entry ledger
//!
//! The ledger is the sole source of truth for balances. Entries are
//! append-only: the store surface exposes no update or delete operation,
//! and the database schema backs that up with a trigger that raises on
//! any attempted mutation (see `sql/schema.sql`).
//!
//! # Invariants
//!
//! 1. Every entry carries a strictly positive amount and is either a
//!    DEBIT or a CREDIT against exactly one account.
//! 2. A completed transfer owns exactly two entries: one DEBIT on the
//!    source and one CREDIT on the destination, equal in amount.
//! 3. An account's balance is `Σ(CREDIT) − Σ(DEBIT)` over its entries,
//!    and is never computed any other way.

pub mod balance;
pub mod entry;
pub mod store;

pub use balance::BalanceCalculator;
pub use entry::{EntryError, EntryType, LedgerEntry, NewLedgerEntry};
pub use store::{EntryTotals, LedgerStore, PgLedgerStore};
