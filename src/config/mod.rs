/// Database configuration and connection management
pub mod database;

/// Application settings from stockwatch.toml and environment variables
pub mod settings;

pub use settings::Settings;
