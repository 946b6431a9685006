//! Account data models

use chrono::{DateTime, Utc};
use std::fmt;

use crate::core_types::{AccountId, UserId};

/// Account lifecycle status
///
/// Status IDs are stored in PostgreSQL as SMALLINT. Accounts are never
/// deleted; CLOSED is the terminal soft state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum AccountStatus {
    Active = 1,
    Frozen = 2,
    Closed = 3,
}

impl AccountStatus {
    /// Get the numeric status ID for PostgreSQL storage
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    /// Convert from PostgreSQL status ID
    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(AccountStatus::Active),
            2 => Some(AccountStatus::Frozen),
            3 => Some(AccountStatus::Closed),
            _ => None,
        }
    }

    /// Get human-readable status name
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Frozen => "FROZEN",
            AccountStatus::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for AccountStatus {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        AccountStatus::from_id(value).ok_or(())
    }
}

/// A user's ledger account
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: AccountId,
    pub user_id: UserId,
    pub status: AccountStatus,
    pub currency: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Only ACTIVE accounts may send or receive transfers
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_id_roundtrip() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Frozen,
            AccountStatus::Closed,
        ] {
            assert_eq!(AccountStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(AccountStatus::from_id(0), None);
        assert_eq!(AccountStatus::from_id(99), None);
    }

    #[test]
    fn test_is_active() {
        let mut account = Account {
            account_id: 1,
            user_id: 10,
            status: AccountStatus::Active,
            currency: "USD".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(account.is_active());

        account.status = AccountStatus::Frozen;
        assert!(!account.is_active());

        account.status = AccountStatus::Closed;
        assert!(!account.is_active());
    }

    #[test]
    fn test_display() {
        assert_eq!(AccountStatus::Active.to_string(), "ACTIVE");
        assert_eq!(AccountStatus::Frozen.to_string(), "FROZEN");
        assert_eq!(AccountStatus::Closed.to_string(), "CLOSED");
    }
}
