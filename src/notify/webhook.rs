//! Webhook alert sink.
//!
//! POSTs the JSON payload `{item, quantity, threshold, message}` to a
//! configured URL. Non-2xx responses count as delivery failures.

use crate::core::monitor::{AlertSink, LowStockAlert};
use crate::errors::Result;
use async_trait::async_trait;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Alert sink backed by an HTTP webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Creates a sink that POSTs to `url`, with a request timeout so a
    /// hung endpoint cannot stall a scan past the next poll tick for long.
    pub fn new(url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl AlertSink for WebhookSink {
    async fn deliver(&self, alert: &LowStockAlert) -> Result<()> {
        self.client
            .post(&self.url)
            .json(alert)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
