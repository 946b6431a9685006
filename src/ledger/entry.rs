//! Ledger entry types

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::core_types::{AccountId, Amount, EntryId};
use crate::transfer::types::TransactionId;

/// Entry direction
///
/// Type IDs are stored in PostgreSQL as SMALLINT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum EntryType {
    Debit = 1,
    Credit = 2,
}

impl EntryType {
    #[inline]
    pub fn id(&self) -> i16 {
        *self as i16
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            1 => Some(EntryType::Debit),
            2 => Some(EntryType::Credit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Debit => "DEBIT",
            EntryType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i16> for EntryType {
    type Error = ();

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        EntryType::from_id(value).ok_or(())
    }
}

/// Rejections raised while constructing an entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("amount must be a positive number of minor units")]
    InvalidAmount,
}

/// An immutable ledger entry as stored
///
/// Once appended, no field may ever change and the row may never be
/// removed. There is deliberately no API anywhere in this crate that
/// updates or deletes one.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    pub entry_id: EntryId,
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub entry_type: EntryType,
    pub amount: Amount,
    pub created_at: DateTime<Utc>,
}

/// A validated entry awaiting append
///
/// Construction is the validation boundary: an amount that is not
/// strictly positive never reaches the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub account_id: AccountId,
    pub transaction_id: TransactionId,
    pub entry_type: EntryType,
    pub amount: Amount,
}

impl NewLedgerEntry {
    pub fn new(
        account_id: AccountId,
        transaction_id: TransactionId,
        entry_type: EntryType,
        amount: Amount,
    ) -> Result<Self, EntryError> {
        if amount <= 0 {
            return Err(EntryError::InvalidAmount);
        }
        Ok(Self {
            account_id,
            transaction_id,
            entry_type,
            amount,
        })
    }

    /// DEBIT entry against `account_id`
    pub fn debit(
        account_id: AccountId,
        transaction_id: TransactionId,
        amount: Amount,
    ) -> Result<Self, EntryError> {
        Self::new(account_id, transaction_id, EntryType::Debit, amount)
    }

    /// CREDIT entry against `account_id`
    pub fn credit(
        account_id: AccountId,
        transaction_id: TransactionId,
        amount: Amount,
    ) -> Result<Self, EntryError> {
        Self::new(account_id, transaction_id, EntryType::Credit, amount)
    }

    /// The two entries of one transfer: a DEBIT on the source and a
    /// CREDIT on the destination, equal in amount and sharing the same
    /// transaction reference. Producing them together makes the
    /// zero-net-amount invariant structural.
    pub fn balanced_pair(
        transaction_id: TransactionId,
        from_account: AccountId,
        to_account: AccountId,
        amount: Amount,
    ) -> Result<(Self, Self), EntryError> {
        Ok((
            Self::debit(from_account, transaction_id, amount)?,
            Self::credit(to_account, transaction_id, amount)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_type_roundtrip() {
        assert_eq!(EntryType::from_id(1), Some(EntryType::Debit));
        assert_eq!(EntryType::from_id(2), Some(EntryType::Credit));
        assert_eq!(EntryType::from_id(0), None);
        assert_eq!(EntryType::from_id(3), None);
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        let txn = TransactionId::new();
        assert_eq!(
            NewLedgerEntry::debit(1, txn, 0),
            Err(EntryError::InvalidAmount)
        );
        assert_eq!(
            NewLedgerEntry::credit(1, txn, -5),
            Err(EntryError::InvalidAmount)
        );
    }

    #[test]
    fn test_balanced_pair_nets_to_zero() {
        let txn = TransactionId::new();
        let (debit, credit) = NewLedgerEntry::balanced_pair(txn, 1, 2, 250).unwrap();

        assert_eq!(debit.entry_type, EntryType::Debit);
        assert_eq!(debit.account_id, 1);
        assert_eq!(credit.entry_type, EntryType::Credit);
        assert_eq!(credit.account_id, 2);
        assert_eq!(debit.amount, credit.amount);
        assert_eq!(debit.transaction_id, credit.transaction_id);
    }
}
