//! Transfer core types

use std::fmt;
use std::str::FromStr;

use super::status::TransferStatus;
use crate::core_types::{AccountId, Amount, UserId};

/// Transaction ID - ULID-based unique identifier
///
/// Using ULID provides:
/// - Monotonic, sortable IDs
/// - No coordination needed (no machine_id)
/// - 128-bit with good entropy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId(ulid::Ulid);

impl TransactionId {
    /// Generate a new unique TransactionId
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Get the inner ULID value
    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TransactionId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(ulid::Ulid::from_string(s)?))
    }
}

/// Authenticated caller identity attached to an inbound request
///
/// Supplied by the authentication middleware; the engine trusts it as
/// already validated. The email and name feed the post-commit
/// notification.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
}

/// A validated transfer request handed to the engine
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub from_account: AccountId,
    pub to_account: AccountId,
    pub amount: Amount,
    pub idempotency_key: String,
}

/// A privileged seed-funds request; the source account is resolved from
/// the system caller's own account
#[derive(Debug, Clone)]
pub struct InitialFundsRequest {
    pub to_account: AccountId,
    pub amount: Amount,
    pub idempotency_key: String,
}

/// Transfer metadata as stored in PostgreSQL
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// Unique transaction ID (ULID, also the DB primary key)
    pub transaction_id: TransactionId,
    pub from_account: AccountId,
    pub to_account: AccountId,
    /// Amount in minor currency units
    pub amount: Amount,
    /// Caller-supplied deduplication token; at most one record per key,
    /// ever
    pub idempotency_key: String,
    pub status: TransferStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRecord {
    /// Create a new transaction record in PENDING status
    pub fn new(
        from_account: AccountId,
        to_account: AccountId,
        amount: Amount,
        idempotency_key: impl Into<String>,
    ) -> Self {
        let now = chrono::Utc::now();
        Self {
            transaction_id: TransactionId::new(),
            from_account,
            to_account,
            amount,
            idempotency_key: idempotency_key.into(),
            status: TransferStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction[{}] {} -> {} amount={} key={} status={}",
            self.transaction_id,
            self.from_account,
            self.to_account,
            self.amount,
            self.idempotency_key,
            self.status
        )
    }
}

/// Outcome of the post-commit notification dispatch
///
/// Kept apart from the transfer result so a delivery failure is visible
/// without ever looking like a failed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationOutcome {
    Delivered,
    Failed(String),
    /// No dispatch attempted (system seed flow)
    Skipped,
}

/// Result of a transfer submission
#[derive(Debug, Clone)]
pub enum TransferOutcome {
    /// A new transfer committed in this request
    Completed {
        transaction: TransactionRecord,
        notification: NotificationOutcome,
    },
    /// Replay of an already-COMPLETED key; no new work was performed
    AlreadyProcessed(TransactionRecord),
    /// A PENDING record exists for this key; the caller must retry later
    InProgress,
    /// The key's transaction was reversed; terminal informational state
    Reversed(TransactionRecord),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_id_roundtrip() {
        let id = TransactionId::new();
        let parsed: TransactionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_transaction_id_rejects_garbage() {
        assert!("not-a-ulid!".parse::<TransactionId>().is_err());
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = TransactionRecord::new(1, 2, 500, "k1");
        assert_eq!(record.status, TransferStatus::Pending);
        assert_eq!(record.from_account, 1);
        assert_eq!(record.to_account, 2);
        assert_eq!(record.amount, 500);
        assert_eq!(record.idempotency_key, "k1");
    }
}
