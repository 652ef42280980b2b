//! Stock record business logic - Handles all ledger-store operations.
//!
//! Provides functions for creating, retrieving, updating, and deleting
//! stock records, and owns the persisted `low_stock` derivation: every
//! write that touches `qty` or `threshold` recomputes the flag here, so a
//! stale flag in the store is a bug, not a transient state.

use crate::{
    entities::{StockRecord, stock_record},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};

/// Direction of a ledger-variant stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Stock received
    In,
    /// Stock issued
    Out,
}

impl Movement {
    /// The wire/store representation of the movement.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Parses the store representation, `None` for anything unrecognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(Self::In),
            "OUT" => Some(Self::Out),
            _ => None,
        }
    }
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `low_stock` derivation: at or below the reorder point.
#[must_use]
pub const fn is_low_stock(qty: i64, threshold: i64) -> bool {
    qty <= threshold
}

/// Retrieves all stock records, newest first (records without a date sort
/// last). This is the full-scan entry point used by the dashboard, the
/// report, and the monitor.
pub async fn get_all_records(db: &DatabaseConnection) -> Result<Vec<stock_record::Model>> {
    StockRecord::find()
        .order_by_desc(stock_record::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a record by its unique ID, returning `None` if absent.
pub async fn get_record_by_id(
    db: &DatabaseConnection,
    record_id: i64,
) -> Result<Option<stock_record::Model>> {
    StockRecord::find_by_id(record_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// The standing low-stock query: all records whose persisted `low_stock`
/// flag is set.
pub async fn get_low_stock_records(db: &DatabaseConnection) -> Result<Vec<stock_record::Model>> {
    StockRecord::find()
        .filter(stock_record::Column::LowStock.eq(true))
        .all(db)
        .await
        .map_err(Into::into)
}

/// Appends a new stock record with the creation timestamp set to now.
///
/// `threshold` defaults to 0 when not supplied, so ledger-variant entries
/// (which carry a `movement` instead) never read as low on positive
/// quantities. Item names are not validated beyond trimming; an empty name
/// is accepted by convention.
pub async fn create_record(
    db: &DatabaseConnection,
    item: String,
    qty: i64,
    movement: Option<Movement>,
    threshold: Option<i64>,
    category: Option<String>,
    remarks: Option<String>,
) -> Result<stock_record::Model> {
    let threshold = threshold.unwrap_or(0);

    let record = stock_record::ActiveModel {
        item: Set(item.trim().to_string()),
        qty: Set(qty),
        movement: Set(movement.map(|m| m.as_str().to_string())),
        threshold: Set(threshold),
        category: Set(category),
        remarks: Set(remarks),
        date: Set(Some(Utc::now())),
        low_stock: Set(is_low_stock(qty, threshold)),
        ..Default::default()
    };

    let result = record.insert(db).await?;
    Ok(result)
}

/// Explicit edit of a record's mutable fields.
///
/// The creation date is never touched. Last write wins; there is no
/// conflict detection between concurrent editors beyond the store's own
/// consistency model.
pub async fn update_record(
    db: &DatabaseConnection,
    record_id: i64,
    item: String,
    qty: i64,
    movement: Option<Movement>,
    threshold: i64,
) -> Result<stock_record::Model> {
    let existing = StockRecord::find_by_id(record_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound { id: record_id })?;

    let mut active: stock_record::ActiveModel = existing.into();
    active.item = Set(item.trim().to_string());
    active.qty = Set(qty);
    active.movement = Set(movement.map(|m| m.as_str().to_string()));
    active.threshold = Set(threshold);
    active.low_stock = Set(is_low_stock(qty, threshold));

    let result = active.update(db).await?;
    Ok(result)
}

/// Deletes a record by ID.
pub async fn delete_record(db: &DatabaseConnection, record_id: i64) -> Result<()> {
    let result = StockRecord::delete_by_id(record_id).exec(db).await?;

    if result.rows_affected == 0 {
        return Err(Error::RecordNotFound { id: record_id });
    }
    Ok(())
}

/// Recomputes and persists the `low_stock` flag for one record.
///
/// Used by the monitor to repair rows whose flag has gone stale (for
/// example, written by an older client that did not maintain the
/// derivation). Returns the record with the corrected flag.
pub async fn refresh_low_stock_flag(
    db: &DatabaseConnection,
    record_id: i64,
) -> Result<stock_record::Model> {
    let existing = StockRecord::find_by_id(record_id)
        .one(db)
        .await?
        .ok_or(Error::RecordNotFound { id: record_id })?;

    let expected = is_low_stock(existing.qty, existing.threshold);
    if existing.low_stock == expected {
        return Ok(existing);
    }

    let mut active: stock_record::ActiveModel = existing.into();
    active.low_stock = Set(expected);

    let result = active.update(db).await?;
    Ok(result)
}
