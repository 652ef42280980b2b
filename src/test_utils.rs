//! Shared test utilities for `StockWatch`.
//!
//! Common helpers for setting up in-memory test databases and creating
//! stock records with sensible defaults.

use crate::{
    core::record::{self, Movement},
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a ledger-variant record (an IN/OUT movement, threshold 0).
pub async fn create_movement_record(
    db: &DatabaseConnection,
    item: &str,
    qty: i64,
    movement: Movement,
) -> Result<entities::stock_record::Model> {
    record::create_record(db, item.to_string(), qty, Some(movement), None, None, None).await
}

/// Creates a snapshot-variant record (an on-hand quantity with a reorder
/// threshold, no movement tag).
pub async fn create_snapshot_record(
    db: &DatabaseConnection,
    item: &str,
    qty: i64,
    threshold: i64,
) -> Result<entities::stock_record::Model> {
    record::create_record(
        db,
        item.to_string(),
        qty,
        None,
        Some(threshold),
        None,
        None,
    )
    .await
}
