//! Application settings loading from stockwatch.toml
//!
//! Settings come from a TOML file with environment-variable overrides on
//! top, so a deployment can run from a checked-in file, pure environment,
//! or a mix. `DATABASE_URL` and `WEBHOOK_URL` always win over the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default polling cadence of the low-stock monitor, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Top-level settings structure representing the entire stockwatch.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Database connection string; falls back to the local `SQLite` file
    #[serde(default = "super::database::get_database_url")]
    pub database_url: String,
    /// Low-stock monitor settings
    pub monitor: MonitorSettings,
    /// Optional mail-relay collaborator; alerts are mirrored to it when set
    pub mail: Option<MailSettings>,
}

/// Settings for the low-stock monitor
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorSettings {
    /// Webhook URL that receives low-stock alert payloads
    pub webhook_url: String,
    /// Seconds between ledger scans
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

/// Settings for the mail-relay collaborator
#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    /// Base URL of the relay process (exposes POST /send-email)
    pub relay_url: String,
    /// Recipient address for alert mails
    pub to: String,
}

fn default_poll_interval_secs() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl MonitorSettings {
    /// The polling cadence as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Settings {
    /// Loads settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the TOML syntax is
    /// invalid, or required fields are missing.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
            message: format!("Failed to read config file: {e}"),
        })?;

        let settings = toml::from_str(&contents).map_err(|e| Error::Config {
            message: format!("Failed to parse stockwatch.toml: {e}"),
        })?;

        Ok(settings)
    }

    /// Loads settings from the default location (./stockwatch.toml, or the
    /// path in `STOCKWATCH_CONFIG`), then applies environment overrides.
    ///
    /// When no config file exists, the environment alone must supply
    /// `WEBHOOK_URL`.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var("STOCKWATCH_CONFIG").unwrap_or_else(|_| "stockwatch.toml".to_string());

        let mut settings = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Self {
                database_url: super::database::get_database_url(),
                monitor: MonitorSettings {
                    webhook_url: std::env::var("WEBHOOK_URL").map_err(|_| Error::Config {
                        message: format!(
                            "No config file at {path} and WEBHOOK_URL is not set"
                        ),
                    })?,
                    poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
                },
                mail: None,
            }
        };

        // Environment always wins over the file
        if let Ok(url) = std::env::var("DATABASE_URL") {
            settings.database_url = url;
        }
        if let Ok(url) = std::env::var("WEBHOOK_URL") {
            settings.monitor.webhook_url = url;
        }

        Ok(settings)
    }
}
