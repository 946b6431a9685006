//! ledgerflow - Double-entry ledger and money transfer engine
//!
//! Balances are derivable solely from immutable ledger entries; an
//! idempotent transfer operation atomically moves funds between two
//! accounts under concurrent load.
//!
//! # Modules
//!
//! - [`core_types`] - Core type aliases (AccountId, Amount, ...)
//! - [`account`] - Account registry (identity, status, currency)
//! - [`ledger`] - Append-only ledger entries and balance derivation
//! - [`transfer`] - Transfer engine, state machine, atomic unit of work
//! - [`notify`] - Post-commit notification sink
//! - [`store`] - Connection pool and storage errors
//! - [`auth`] - JWT bearer authentication context
//! - [`gateway`] - Axum HTTP surface
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing subscriber setup

// Core types - must be first!
pub mod core_types;

// Domain components
pub mod account;
pub mod ledger;
pub mod notify;
pub mod transfer;

// Infrastructure
pub mod auth;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod store;

// Convenient re-exports at crate root
pub use account::{Account, AccountRegistry, AccountStatus};
pub use core_types::{AccountId, Amount, EntryId, UserId};
pub use ledger::{BalanceCalculator, EntryType, LedgerEntry, LedgerStore, NewLedgerEntry};
pub use store::{Database, StoreError};
pub use transfer::{
    Caller, TransactionId, TransactionRecord, TransferEngine, TransferError, TransferOutcome,
    TransferStatus,
};
