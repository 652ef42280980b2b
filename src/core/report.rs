//! Inventory report assembly.
//!
//! Builds structured report data (rows plus snapshot totals) that an
//! exporter or front end can render. The actual output bytes (PDF,
//! spreadsheet) are someone else's problem; this module only decides what
//! goes into the table.

use crate::{
    core::aggregate::{self, RecordFilter, SnapshotTotals},
    core::record,
    entities::stock_record::Model,
    errors::Result,
};
use sea_orm::DatabaseConnection;

/// Report filter: month and/or year only. The report has no movement
/// column, so no movement filter either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Calendar month, 1..=12
    pub month: Option<u32>,
    /// Calendar year
    pub year: Option<i32>,
}

impl From<ReportFilter> for RecordFilter {
    fn from(f: ReportFilter) -> Self {
        Self {
            month: f.month,
            year: f.year,
            movement: None,
        }
    }
}

/// One row of the report table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// Item display name
    pub item: String,
    /// Quantity (on hand, or units moved for ledger entries)
    pub qty: i64,
    /// Reorder threshold; 0 for ledger entries
    pub threshold: i64,
    /// Record creation date, formatted for display
    pub date: String,
}

/// A complete inventory report ready for rendering.
#[derive(Debug, Clone)]
pub struct InventoryReport {
    /// Report heading
    pub title: String,
    /// The filter the report was built with
    pub filter: ReportFilter,
    /// Table rows, in ledger order (newest first)
    pub rows: Vec<ReportRow>,
    /// Quantity and shortfall totals over the filtered set
    pub totals: SnapshotTotals,
}

/// Builds a report from an in-memory record set. Pure; shares the
/// aggregator's filtering, so dateless records are excluded here too.
#[must_use]
pub fn build_report(records: &[Model], filter: ReportFilter) -> InventoryReport {
    let filtered = aggregate::filter_records(records, &filter.into());
    let totals = aggregate::snapshot_totals(&filtered);

    let rows = filtered
        .iter()
        .map(|r| ReportRow {
            item: r.item.clone(),
            qty: r.qty,
            threshold: r.threshold,
            // Filtering already dropped dateless records
            date: r
                .date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        })
        .collect();

    InventoryReport {
        title: "Inventory Report".to_string(),
        filter,
        rows,
        totals,
    }
}

/// Fetches the full ledger and builds a report over it.
pub async fn generate_inventory_report(
    db: &DatabaseConnection,
    filter: ReportFilter,
) -> Result<InventoryReport> {
    let records = record::get_all_records(db).await?;
    Ok(build_report(&records, filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_snapshot_record, setup_test_db};
    use chrono::Datelike;

    #[tokio::test]
    async fn test_generate_report_over_store() -> Result<()> {
        let db = setup_test_db().await?;
        create_snapshot_record(&db, "Washer", 3, 5).await?;
        create_snapshot_record(&db, "Gasket", 7, 5).await?;

        let report = generate_inventory_report(&db, ReportFilter::default()).await?;

        assert_eq!(report.title, "Inventory Report");
        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.totals.total_qty, 10);
        assert_eq!(report.totals.shortfall, 2);
        assert!(report.rows.iter().all(|r| !r.date.is_empty()));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_month_filter_excludes_other_months() -> Result<()> {
        let db = setup_test_db().await?;
        let record = create_snapshot_record(&db, "Washer", 3, 5).await?;

        // Records are created "now"; a filter for a different month is empty
        let now_month = record.date.map(|d| d.month());
        let other_month = now_month.map(|m| if m == 1 { 2 } else { 1 });

        let report = generate_inventory_report(
            &db,
            ReportFilter {
                month: other_month,
                year: None,
            },
        )
        .await?;
        assert!(report.rows.is_empty());
        assert_eq!(report.totals.shortfall, 0);

        let report = generate_inventory_report(
            &db,
            ReportFilter {
                month: now_month,
                year: None,
            },
        )
        .await?;
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].item, "Washer");
        Ok(())
    }
}
