//! Transfer notification sink
//!
//! Invoked after a transfer commits, never inside the atomic scope. The
//! engine treats dispatch as best-effort: a delivery failure is logged
//! and reported in the outcome, and never rolls back or flags the
//! committed transfer.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::NotificationConfig;
use crate::core_types::{AccountId, Amount};

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook dispatch failed: {0}")]
    Dispatch(#[from] reqwest::Error),

    #[error("webhook rejected notification: HTTP {0}")]
    Rejected(u16),
}

/// Payload delivered to the configured sink
#[derive(Debug, Clone, Serialize)]
pub struct TransferNotification {
    pub recipient_email: String,
    pub recipient_name: String,
    pub amount: Amount,
    pub to_account: AccountId,
}

/// Best-effort post-commit notification dispatch
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify_transfer(&self, notification: TransferNotification) -> Result<(), NotifyError>;
}

/// JSON webhook sink
///
/// POSTs the notification to the configured URL with a bounded timeout
/// so a slow receiver cannot stall request handling.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(config: &NotificationConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookNotifier {
    async fn notify_transfer(&self, notification: TransferNotification) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&notification)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }

        tracing::debug!(
            recipient = %notification.recipient_email,
            amount = notification.amount,
            to_account = notification.to_account,
            "transfer notification delivered"
        );
        Ok(())
    }
}

/// Recording sink for tests
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    pub struct RecordingSink {
        delivered: Mutex<Vec<TransferNotification>>,
        fail: AtomicBool,
    }

    impl RecordingSink {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_fail(&self, fail: bool) {
            self.fail.store(fail, Ordering::SeqCst);
        }

        pub fn delivered_count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }

        pub fn last_delivered(&self) -> Option<TransferNotification> {
            self.delivered.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        async fn notify_transfer(
            &self,
            notification: TransferNotification,
        ) -> Result<(), NotifyError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(NotifyError::Rejected(502));
            }
            self.delivered.lock().unwrap().push(notification);
            Ok(())
        }
    }
}

/// Log-only sink used when no webhook is configured
pub struct LogNotifier;

#[async_trait]
impl NotificationSink for LogNotifier {
    async fn notify_transfer(&self, notification: TransferNotification) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %notification.recipient_email,
            recipient_name = %notification.recipient_name,
            amount = notification.amount,
            to_account = notification.to_account,
            "transfer completed (notification webhook disabled)"
        );
        Ok(())
    }
}
