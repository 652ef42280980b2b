//! Outbound collaborator clients.
//!
//! Delivery here is fire-and-forget from the monitor's point of view:
//! errors bubble up to be logged, never retried synchronously.

/// Mail relay client - mirrors alerts as `{to, subject, text}` mails
pub mod mailer;
/// Webhook sink - POSTs low-stock alert payloads
pub mod webhook;

pub use mailer::MailRelayClient;
pub use webhook::WebhookSink;
