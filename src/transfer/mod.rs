//! Money transfer engine
//!
//! Moves funds between two accounts by appending a balanced pair of
//! ledger entries and a transaction record in one atomic unit.
//!
//! # State machine
//!
//! ```text
//! PENDING → COMPLETED
//!     ↓
//!  FAILED          (REVERSED reserved for the reversal workflow)
//! ```
//!
//! # Safety invariants
//!
//! 1. **Idempotency**: one idempotency key maps to at most one
//!    transaction record, ever; replays answer from the record.
//! 2. **All-or-nothing**: the transaction record and both ledger
//!    entries become visible together or not at all.
//! 3. **No stale balance**: the source balance is re-derived inside the
//!    atomic scope, under the storage layer's row lock.

pub mod engine;
pub mod error;
pub mod status;
pub mod store;
pub mod types;


// Re-exports for convenience
pub use engine::TransferEngine;
pub use error::TransferError;
pub use status::TransferStatus;
pub use store::{
    PgTransactionStore, PgTransferStore, TransactionStore, TransferStore, TransferUnitOfWork,
};
pub use types::{
    Caller, InitialFundsRequest, NotificationOutcome, TransactionId, TransactionRecord,
    TransferOutcome, TransferRequest,
};
