//! Balance derivation
//!
//! Balances are never stored. This service recomputes them from the
//! ledger on every call so a transfer validates against the freshest
//! possible figure.

use std::sync::Arc;

use super::store::LedgerStore;
use crate::core_types::{AccountId, Amount};
use crate::store::StoreError;

/// Stateless balance derivation over an injected ledger store
#[derive(Clone)]
pub struct BalanceCalculator {
    ledger: Arc<dyn LedgerStore>,
}

impl BalanceCalculator {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Derive the account balance: `Σ(CREDIT) − Σ(DEBIT)` over its
    /// ledger entries, `0` when none exist. Pure read, computed fresh.
    pub async fn get_balance(&self, account_id: AccountId) -> Result<Amount, StoreError> {
        let totals = self.ledger.debit_credit_totals(account_id).await?;
        Ok(totals.net())
    }
}
