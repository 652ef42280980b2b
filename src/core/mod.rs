//! Core business logic - framework-agnostic inventory operations.
//!
//! Everything in here is independent of the storage transport and of any
//! front end: record CRUD against the ledger store, pure aggregation over
//! in-memory record sets, report assembly, and the low-stock monitor.

/// Filtering, running totals, and pagination over record sets
pub mod aggregate;
/// Low-stock monitoring state machine and polling loop
pub mod monitor;
/// Stock record CRUD and the `low_stock` invariant
pub mod record;
/// Structured inventory report assembly
pub mod report;

pub use record::Movement;
