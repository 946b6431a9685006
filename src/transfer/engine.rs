//! Transfer engine
//!
//! Orchestrates the end-to-end transfer flow:
//!
//! 1. Validate request shape
//! 2. Resolve both accounts
//! 3. Idempotency check (replay, never re-execute)
//! 4. Account-status gate
//! 5. Derive source balance from the ledger
//! 6. Atomic write: PENDING transaction + DEBIT + CREDIT + COMPLETED
//! 7. Post-commit notification (best-effort)
//!
//! Every collaborator arrives through constructor injection so tests
//! can swap in doubles. No in-process lock spans the balance check and
//! the write; step 6 re-derives the balance under the storage layer's
//! row lock, which is what makes concurrent debits of one account safe.

use std::sync::Arc;

use tracing::{error, info};

use super::error::TransferError;
use super::status::TransferStatus;
use super::store::{TransactionStore, TransferStore, TransferUnitOfWork};
use super::types::{
    Caller, InitialFundsRequest, NotificationOutcome, TransactionId, TransactionRecord,
    TransferOutcome, TransferRequest,
};
use crate::account::{Account, AccountRegistry};
use crate::core_types::{AccountId, Amount};
use crate::ledger::BalanceCalculator;
use crate::ledger::entry::NewLedgerEntry;
use crate::notify::{NotificationSink, TransferNotification};
use crate::store::StoreError;

/// Errors inside the atomic scope keep their idempotency semantics; any
/// other storage fault there means the unit did not commit.
fn atomic_err(e: StoreError) -> TransferError {
    match e {
        StoreError::DuplicateKey => TransferError::DuplicateKey,
        other => TransferError::TransferFailed {
            cause: other.to_string(),
        },
    }
}

fn validate_amount_and_key(amount: Amount, idempotency_key: &str) -> Result<(), TransferError> {
    if amount <= 0 {
        return Err(TransferError::InvalidRequest(
            "amount must be a positive number of minor units".to_string(),
        ));
    }
    if idempotency_key.trim().is_empty() {
        return Err(TransferError::InvalidRequest(
            "idempotencyKey is required".to_string(),
        ));
    }
    Ok(())
}

fn require_active(account: &Account) -> Result<(), TransferError> {
    if !account.is_active() {
        return Err(TransferError::AccountNotActive {
            account_id: account.account_id,
            status: account.status,
        });
    }
    Ok(())
}

/// The transfer orchestrator
pub struct TransferEngine {
    accounts: Arc<dyn AccountRegistry>,
    transactions: Arc<dyn TransactionStore>,
    balances: BalanceCalculator,
    store: Arc<dyn TransferStore>,
    notifier: Arc<dyn NotificationSink>,
}

impl TransferEngine {
    pub fn new(
        accounts: Arc<dyn AccountRegistry>,
        transactions: Arc<dyn TransactionStore>,
        balances: BalanceCalculator,
        store: Arc<dyn TransferStore>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            accounts,
            transactions,
            balances,
            store,
            notifier,
        }
    }

    /// Execute a peer-to-peer transfer
    pub async fn transfer(
        &self,
        caller: &Caller,
        request: TransferRequest,
    ) -> Result<TransferOutcome, TransferError> {
        // 1. Request shape
        validate_amount_and_key(request.amount, &request.idempotency_key)?;
        if request.from_account == request.to_account {
            return Err(TransferError::InvalidRequest(
                "fromAccount and toAccount must be different accounts".to_string(),
            ));
        }

        // 2. Resolve accounts
        let from = self
            .accounts
            .find_by_id(request.from_account)
            .await?
            .ok_or_else(|| {
                TransferError::InvalidRequest("Invalid fromAccount or toAccount".to_string())
            })?;
        let to = self
            .accounts
            .find_by_id(request.to_account)
            .await?
            .ok_or_else(|| {
                TransferError::InvalidRequest("Invalid fromAccount or toAccount".to_string())
            })?;

        // 3. Idempotency check: an existing record answers the request
        if let Some(outcome) = self.replay_for_key(&request.idempotency_key).await? {
            info!(
                idempotency_key = %request.idempotency_key,
                "idempotent replay, no new work performed"
            );
            return Ok(outcome);
        }

        // 4. Account-status gate
        require_active(&from)?;
        require_active(&to)?;

        // 5. Fresh derived balance; step 6 re-checks under the row lock
        let balance = self.balances.get_balance(from.account_id).await?;
        if balance < request.amount {
            return Err(TransferError::InsufficientFunds {
                balance,
                requested: request.amount,
            });
        }

        // 6. Atomic write
        let transaction = self
            .commit_atomic(
                from.account_id,
                to.account_id,
                request.amount,
                &request.idempotency_key,
                true,
            )
            .await?;

        info!(
            transaction_id = %transaction.transaction_id,
            from_account = from.account_id,
            to_account = to.account_id,
            amount = request.amount,
            "transfer committed"
        );

        // 7. Post-commit notification, outside the atomic boundary
        let notification = self.notify_sender(caller, &transaction).await;

        Ok(TransferOutcome::Completed {
            transaction,
            notification,
        })
    }

    /// Seed funds into an account from the system caller's own account
    ///
    /// Same idempotent atomic flow as [`transfer`](Self::transfer), with
    /// the insufficient-funds gate skipped: the system account is the
    /// money-supply origin and its ledger may go net-negative.
    pub async fn initial_funds(
        &self,
        caller: &Caller,
        request: InitialFundsRequest,
    ) -> Result<TransferOutcome, TransferError> {
        validate_amount_and_key(request.amount, &request.idempotency_key)?;

        let to = self
            .accounts
            .find_by_id(request.to_account)
            .await?
            .ok_or_else(|| TransferError::InvalidRequest("Invalid toAccount".to_string()))?;

        let from = self
            .accounts
            .find_by_user(caller.user_id)
            .await?
            .ok_or_else(|| {
                TransferError::InvalidRequest("System account not found for the user".to_string())
            })?;

        if from.account_id == to.account_id {
            return Err(TransferError::InvalidRequest(
                "cannot seed the system account from itself".to_string(),
            ));
        }

        if let Some(outcome) = self.replay_for_key(&request.idempotency_key).await? {
            info!(
                idempotency_key = %request.idempotency_key,
                "idempotent replay of initial-funds request"
            );
            return Ok(outcome);
        }

        require_active(&to)?;

        let transaction = self
            .commit_atomic(
                from.account_id,
                to.account_id,
                request.amount,
                &request.idempotency_key,
                false,
            )
            .await?;

        info!(
            transaction_id = %transaction.transaction_id,
            to_account = to.account_id,
            amount = request.amount,
            "initial funds committed"
        );

        Ok(TransferOutcome::Completed {
            transaction,
            notification: NotificationOutcome::Skipped,
        })
    }

    /// Look up a transaction, e.g. to poll a PENDING transfer
    pub async fn get_transaction(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Option<TransactionRecord>, TransferError> {
        Ok(self.transactions.find_by_id(transaction_id).await?)
    }

    /// Map an existing record for this key onto the caller's answer.
    /// Returns None when no record exists and the transfer may proceed.
    async fn replay_for_key(&self, key: &str) -> Result<Option<TransferOutcome>, TransferError> {
        let Some(existing) = self.transactions.find_by_idempotency_key(key).await? else {
            return Ok(None);
        };

        match existing.status {
            TransferStatus::Completed => Ok(Some(TransferOutcome::AlreadyProcessed(existing))),
            TransferStatus::Pending => Ok(Some(TransferOutcome::InProgress)),
            TransferStatus::Reversed => Ok(Some(TransferOutcome::Reversed(existing))),
            TransferStatus::Failed => Err(TransferError::PreviousAttemptFailed),
        }
    }

    /// Step 6: all four writes commit together or none do
    async fn commit_atomic(
        &self,
        from_account: AccountId,
        to_account: AccountId,
        amount: Amount,
        idempotency_key: &str,
        enforce_funds: bool,
    ) -> Result<TransactionRecord, TransferError> {
        let mut uow = self.store.begin().await.map_err(atomic_err)?;

        let staged = self
            .stage_writes(
                uow.as_mut(),
                from_account,
                to_account,
                amount,
                idempotency_key,
                enforce_funds,
            )
            .await;

        match staged {
            Ok(record) => match uow.commit().await {
                Ok(()) => Ok(record),
                Err(StoreError::DuplicateKey) => Err(TransferError::DuplicateKey),
                Err(e) => Err(TransferError::TransferFailed {
                    cause: e.to_string(),
                }),
            },
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    error!(
                        error = %rollback_err,
                        "rollback failed after aborted transfer"
                    );
                }
                Err(err)
            }
        }
    }

    async fn stage_writes(
        &self,
        uow: &mut dyn TransferUnitOfWork,
        from_account: AccountId,
        to_account: AccountId,
        amount: Amount,
        idempotency_key: &str,
        enforce_funds: bool,
    ) -> Result<TransactionRecord, TransferError> {
        // Serializes concurrent debits of the same source account and
        // re-derives the balance inside the atomic scope, closing the
        // check-then-write race.
        let balance = uow.locked_balance(from_account).await.map_err(atomic_err)?;
        if enforce_funds && balance < amount {
            return Err(TransferError::InsufficientFunds {
                balance,
                requested: amount,
            });
        }

        let mut record = TransactionRecord::new(from_account, to_account, amount, idempotency_key);
        uow.insert_transaction(&record).await.map_err(atomic_err)?;

        let (debit, credit) =
            NewLedgerEntry::balanced_pair(record.transaction_id, from_account, to_account, amount)
                .map_err(|e| TransferError::InvalidRequest(e.to_string()))?;
        uow.append_entry(debit).await.map_err(atomic_err)?;
        uow.append_entry(credit).await.map_err(atomic_err)?;

        uow.set_status(
            record.transaction_id,
            TransferStatus::Pending,
            TransferStatus::Completed,
        )
        .await
        .map_err(atomic_err)?;

        record.status = TransferStatus::Completed;
        record.updated_at = chrono::Utc::now();
        Ok(record)
    }

    async fn notify_sender(
        &self,
        caller: &Caller,
        transaction: &TransactionRecord,
    ) -> NotificationOutcome {
        let notification = TransferNotification {
            recipient_email: caller.email.clone(),
            recipient_name: caller.name.clone(),
            amount: transaction.amount,
            to_account: transaction.to_account,
        };

        match self.notifier.notify_transfer(notification).await {
            Ok(()) => NotificationOutcome::Delivered,
            Err(e) => {
                // The transfer is already durable; delivery problems are
                // reported, never rolled back.
                tracing::warn!(
                    transaction_id = %transaction.transaction_id,
                    error = %e,
                    "transfer notification failed"
                );
                NotificationOutcome::Failed(e.to_string())
            }
        }
    }
}
