//! Mail relay client.
//!
//! The relay is a separate process exposing `POST /send-email` with a
//! `{to, subject, text}` body; it owns the actual mail-provider wire
//! protocol. This client only speaks to the relay.

use crate::errors::Result;
use serde::Serialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct MailMessage<'a> {
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Client for the mail relay collaborator.
#[derive(Debug, Clone)]
pub struct MailRelayClient {
    client: reqwest::Client,
    endpoint: String,
    to: String,
}

impl MailRelayClient {
    /// Creates a client for the relay at `relay_url`, sending to `to`.
    pub fn new(relay_url: &str, to: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/send-email", relay_url.trim_end_matches('/')),
            to,
        })
    }

    /// Sends one mail through the relay; non-2xx counts as failure.
    pub async fn send(&self, subject: &str, text: &str) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .json(&MailMessage {
                to: &self.to,
                subject,
                text,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_trailing_slash() -> Result<()> {
        let client = MailRelayClient::new("http://localhost:5000/", "ops@example.com".into())?;
        assert_eq!(client.endpoint, "http://localhost:5000/send-email");

        let client = MailRelayClient::new("http://localhost:5000", "ops@example.com".into())?;
        assert_eq!(client.endpoint, "http://localhost:5000/send-email");
        Ok(())
    }
}
