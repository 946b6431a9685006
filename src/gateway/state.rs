use std::sync::Arc;

use crate::account::AccountRegistry;
use crate::auth::AuthVerifier;
use crate::ledger::BalanceCalculator;
use crate::store::Database;
use crate::transfer::TransferEngine;

/// Shared gateway application state
pub struct AppState {
    /// Transfer orchestrator
    pub engine: Arc<TransferEngine>,
    /// Account lookups for the balance endpoint
    pub accounts: Arc<dyn AccountRegistry>,
    /// Derived-balance reads
    pub balances: BalanceCalculator,
    /// Token verification
    pub auth: Arc<AuthVerifier>,
    /// Connection pool handle, used by the health check
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(
        engine: Arc<TransferEngine>,
        accounts: Arc<dyn AccountRegistry>,
        balances: BalanceCalculator,
        auth: Arc<AuthVerifier>,
        db: Arc<Database>,
    ) -> Self {
        Self {
            engine,
            accounts,
            balances,
            auth,
            db,
        }
    }
}
