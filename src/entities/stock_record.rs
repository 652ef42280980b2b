//! Stock record entity - one inventory movement or item snapshot.
//!
//! The ledger is append-mostly: records are created by the stock-entry
//! flow, edited only explicitly, and deleted explicitly. Ledger-variant
//! records carry a `movement` tag (IN/OUT); snapshot-variant records carry
//! a reorder `threshold` against their on-hand `qty`. Both shapes live in
//! the same table and are never reconciled against each other.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock record database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_records")]
pub struct Model {
    /// Unique identifier, assigned by the store on creation
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name of the item (e.g., "Bolt", "Hex Nut")
    pub item: String,
    /// Units moved (ledger variant) or current on-hand quantity (snapshot variant)
    pub qty: i64,
    /// `"IN"` or `"OUT"` for ledger-variant records, `None` for snapshots
    pub movement: Option<String>,
    /// Reorder point for snapshot-variant records; 0 when not supplied
    pub threshold: i64,
    /// Optional free-text category, no effect on aggregation
    pub category: Option<String>,
    /// Optional free-text remarks, no effect on aggregation
    pub remarks: Option<String>,
    /// When the record was created; immutable after creation. `None` marks
    /// a record whose date was missing or unparseable at import time
    pub date: Option<DateTimeUtc>,
    /// Persisted derivation of `qty <= threshold`, kept so the monitor can
    /// run a standing low-stock query
    pub low_stock: bool,
}

/// Stock records have no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
