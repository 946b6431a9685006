//! Transfer status definitions
//!
//! Status IDs are stored in PostgreSQL as SMALLINT.

use std::fmt;

/// Transaction record status
///
/// ```text
/// PENDING → COMPLETED
///     ↓
///  FAILED
/// ```
///
/// REVERSED is reserved for the (out-of-core) reversal workflow; no
/// transition out of FAILED or REVERSED is defined here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum TransferStatus {
    /// Transaction record created, ledger entries not yet committed
    Pending = 0,

    /// Terminal: both ledger entries durably written
    Completed = 10,

    /// Terminal: the atomic write did not complete
    Failed = -10,

    /// Terminal: transfer was reversed after completion
    Reversed = -20,
}

impl TransferStatus {
    /// Check if this is a terminal state (no more transitions possible)
    #[inline]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TransferStatus::Pending)
    }

    /// Get the numeric status ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL status ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(TransferStatus::Pending),
            10 => Some(TransferStatus::Completed),
            -10 => Some(TransferStatus::Failed),
            -20 => Some(TransferStatus::Reversed),
            _ => None,
        }
    }

    /// Get human-readable status name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Pending => "PENDING",
            TransferStatus::Completed => "COMPLETED",
            TransferStatus::Failed => "FAILED",
            TransferStatus::Reversed => "REVERSED",
        }
    }
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for TransferStatus {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        TransferStatus::from_id(value).ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Failed.is_terminal());
        assert!(TransferStatus::Reversed.is_terminal());
        assert!(!TransferStatus::Pending.is_terminal());
    }

    #[test]
    fn test_status_id_roundtrip() {
        let statuses = [
            TransferStatus::Pending,
            TransferStatus::Completed,
            TransferStatus::Failed,
            TransferStatus::Reversed,
        ];

        for status in statuses {
            let id = status.id();
            let recovered = TransferStatus::from_id(id).unwrap();
            assert_eq!(status, recovered);
        }
    }

    #[test]
    fn test_invalid_status_id() {
        assert!(TransferStatus::from_id(999).is_none());
        assert!(TransferStatus::from_id(-999).is_none());
        assert!(TransferStatus::from_id(1).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(TransferStatus::Pending.to_string(), "PENDING");
        assert_eq!(TransferStatus::Completed.to_string(), "COMPLETED");
        assert_eq!(TransferStatus::Failed.to_string(), "FAILED");
        assert_eq!(TransferStatus::Reversed.to_string(), "REVERSED");
    }
}
