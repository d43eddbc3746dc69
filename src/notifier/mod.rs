//! Notification dispatch
//!
//! Best-effort delivery of transfer notifications. Dispatch is
//! fire-and-forget: the batch runs on a detached task, each message is
//! attempted once, and failures are logged but never surfaced to the
//! operation that triggered them.

mod client;

pub use client::HttpNotifier;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;

/// One message for one recipient. Also the wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub email: String,
    pub message: String,
}

impl Notification {
    pub fn new(email: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            message: message.into(),
        }
    }
}

/// Delivery errors. Callers of `dispatch` never see these.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Notification service unavailable (status {0})")]
    Unavailable(reqwest::StatusCode),
}

/// Delivery channel for a single notification.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError>;
}

/// Fans a batch of notifications out on a detached task.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    /// Send the batch in order, one attempt per message, on a spawned task.
    ///
    /// Returns immediately. The handle is only there for callers that need
    /// to observe completion (tests do); dropping it leaves the sends
    /// running detached.
    pub fn dispatch(&self, notifications: Vec<Notification>) -> JoinHandle<()> {
        let sink = Arc::clone(&self.sink);

        tokio::spawn(async move {
            for notification in notifications {
                if let Err(e) = sink.send(&notification).await {
                    tracing::error!(
                        email = %notification.email,
                        error = %e,
                        "Failed to send notification"
                    );
                }
            }
        })
    }
}
