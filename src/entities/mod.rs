//! Entity module - Contains all SeaORM entity definitions for the database.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod stock_record;

// Re-export specific types to avoid conflicts
pub use stock_record::{
    Column as StockRecordColumn, Entity as StockRecord, Model as StockRecordModel,
};
