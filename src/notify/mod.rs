//! Failure notifications
//!
//! Posts a small JSON document to a webhook when a run fails. Delivery
//! problems are logged and never turn into run errors.

use crate::error::{Error, Result};
use serde::Serialize;
use std::time::Duration;

/// Payload posted to the webhook
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Short summary
    pub subject: String,
    /// Full message
    pub content: String,
    /// Unix timestamp (seconds)
    pub timestamp: i64,
}

/// Webhook notifier
#[derive(Debug, Clone)]
pub struct Notifier {
    url: String,
    client: reqwest::Client,
}

impl Notifier {
    /// Create a notifier posting to `url`
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url = url.into();
        url::Url::parse(&url)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { url, client })
    }

    /// Webhook URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver a notification, returning delivery errors
    pub async fn try_send(&self, subject: &str, content: &str) -> Result<()> {
        let payload = Notification {
            subject: subject.to_string(),
            content: content.to_string(),
            timestamp: chrono::Utc::now().timestamp(),
        };

        let response = self.client.post(&self.url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::notify(format!(
                "webhook {} returned HTTP {}",
                self.url,
                status.as_u16()
            )));
        }
        Ok(())
    }

    /// Deliver a notification, logging delivery errors
    ///
    /// Returns whether the webhook accepted it.
    pub async fn send(&self, subject: &str, content: &str) -> bool {
        match self.try_send(subject, content).await {
            Ok(()) => {
                tracing::info!(url = %self.url, subject, "Notification sent");
                true
            }
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Notification failed");
                false
            }
        }
    }
}
