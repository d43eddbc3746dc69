//! HTTP notification client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::{Notification, NotificationError, NotificationSink};

/// Sink implementation backed by the external notification endpoint.
/// The service acknowledges with 204 No Content; anything else counts as
/// unavailable.
pub struct HttpNotifier {
    client: Client,
    url: String,
}

impl HttpNotifier {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl NotificationSink for HttpNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.url)
            .json(notification)
            .send()
            .await?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(NotificationError::Unavailable(response.status()));
        }

        Ok(())
    }
}
