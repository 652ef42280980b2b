//! Unified error types for `StockWatch`.

use thiserror::Error;

/// All errors the crate can produce.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file or value was missing or malformed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of what was wrong
        message: String,
    },

    /// The ledger store rejected or failed an operation.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// A record id was not present in the store.
    #[error("Stock record not found: id {id}")]
    RecordNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// An outbound notification could not be delivered.
    #[error("Notification delivery failed: {0}")]
    Notification(#[from] reqwest::Error),

    /// I/O failure (config file reads and the like).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable was missing or invalid.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

/// Convenience `Result` type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
