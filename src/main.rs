//! `StockWatch` monitor service entry point.
//!
//! Wires the pieces together and runs the low-stock polling monitor until
//! a shutdown signal arrives.

use dotenvy::dotenv;
use std::sync::Arc;
use stockwatch::config::{Settings, database};
use stockwatch::core::monitor::{AlertSink, LowStockMonitor};
use stockwatch::errors::Result;
use stockwatch::notify::{MailRelayClient, WebhookSink};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; non-fatal, env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application settings (file + environment overrides)
    let settings =
        Settings::load().inspect_err(|e| error!("Failed to load application settings: {e}"))?;
    info!("Successfully processed application settings.");

    // 4. Initialize the ledger store
    let db = database::create_connection(&settings.database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to the database: {e}"))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database tables: {e}"))?;

    // 5. Build the outbound clients
    let sink: Arc<dyn AlertSink> = Arc::new(WebhookSink::new(settings.monitor.webhook_url.clone())?);
    let mailer = match &settings.mail {
        Some(mail) => Some(MailRelayClient::new(&mail.relay_url, mail.to.clone())?),
        None => None,
    };

    // 6. Run the monitor until ctrl-c
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let monitor = LowStockMonitor::new(db, sink, mailer, settings.monitor.poll_interval());
    let handle = tokio::spawn(monitor.run(shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received.");

    // Stop issuing scans; the in-flight scan finishes before the task ends
    let _ = shutdown_tx.send(true);
    if let Err(e) = handle.await {
        warn!("Monitor task ended abnormally: {e}");
    }

    Ok(())
}
