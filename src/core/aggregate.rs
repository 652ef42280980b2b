//! Aggregation over in-memory record sets.
//!
//! Pure, synchronous, single-pass computations: filtering by month, year,
//! and movement; running totals for both schema variants; and fixed-size
//! pagination. Nothing here mutates its input or touches the store, so the
//! same filter over the same records always yields the same result and the
//! functions are safe to call from any number of callers at once.

use crate::core::record::Movement;
use crate::entities::stock_record::Model;
use chrono::Datelike;

/// Records shown per page, matching the dashboard and the report table.
pub const PAGE_SIZE: usize = 5;

/// Filter over the record set. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Calendar month of the record's date, 1..=12
    pub month: Option<u32>,
    /// Calendar year of the record's date
    pub year: Option<i32>,
    /// Movement direction; only ledger-variant records can match when set
    pub movement: Option<Movement>,
}

/// Running totals for the movement-ledger variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerTotals {
    /// Sum of quantities over `IN` movements
    pub in_total: i64,
    /// Sum of quantities over `OUT` movements
    pub out_total: i64,
}

/// Running totals for the quantity-snapshot variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SnapshotTotals {
    /// Sum of on-hand quantities
    pub total_qty: i64,
    /// Sum of `max(0, threshold - qty)` over all records, never negative
    pub shortfall: i64,
}

/// Applies `filter` to `records`, preserving order.
///
/// A record without a usable date cannot be placed in any month/year view,
/// so it is skipped rather than failing the whole pass. The result is
/// always a subsequence of the input.
#[must_use]
pub fn filter_records<'a>(records: &'a [Model], filter: &RecordFilter) -> Vec<&'a Model> {
    records.iter().filter(|r| matches(r, filter)).collect()
}

fn matches(record: &Model, filter: &RecordFilter) -> bool {
    let Some(date) = record.date else {
        return false;
    };
    if let Some(month) = filter.month {
        if date.month() != month {
            return false;
        }
    }
    if let Some(year) = filter.year {
        if date.year() != year {
            return false;
        }
    }
    if let Some(movement) = filter.movement {
        if record.movement.as_deref() != Some(movement.as_str()) {
            return false;
        }
    }
    true
}

/// Sums IN and OUT quantities over a filtered set in a single pass.
/// Records without a movement tag (snapshots) contribute to neither total.
#[must_use]
pub fn ledger_totals(filtered: &[&Model]) -> LedgerTotals {
    let mut totals = LedgerTotals::default();
    for record in filtered {
        match record.movement.as_deref() {
            Some("IN") => totals.in_total += record.qty,
            Some("OUT") => totals.out_total += record.qty,
            _ => {}
        }
    }
    totals
}

/// Sums quantities and reorder shortfall over a filtered set in a single
/// pass. The shortfall counts every record's `max(0, threshold - qty)`,
/// not just the ones currently flagged low.
#[must_use]
pub fn snapshot_totals(filtered: &[&Model]) -> SnapshotTotals {
    let mut totals = SnapshotTotals::default();
    for record in filtered {
        totals.total_qty += record.qty;
        totals.shortfall += (record.threshold - record.qty).max(0);
    }
    totals
}

/// Number of pages needed for `len` records; 0 means "no pages."
#[must_use]
pub const fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE)
}

/// Clamps a 1-based page index into `[1, total_pages]`. An empty result
/// set has no pages; page 1 is returned so callers always hold a valid
/// (if empty) position.
#[must_use]
pub const fn clamp_page(page: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        return 1;
    }
    if page < 1 {
        1
    } else if page > total_pages {
        total_pages
    } else {
        page
    }
}

/// The records visible on a 1-based page of the filtered set.
#[must_use]
pub fn page_slice<'a, 'b>(filtered: &'b [&'a Model], page: usize) -> &'b [&'a Model] {
    let start = page.saturating_sub(1) * PAGE_SIZE;
    if start >= filtered.len() {
        return &[];
    }
    let end = (start + PAGE_SIZE).min(filtered.len());
    &filtered[start..end]
}

/// UI-facing view state for the dashboard: the active filter plus the
/// current page. Changing any filter field resets the page to 1; the page
/// index is clamped against the filtered set on every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    filter: RecordFilter,
    page: usize,
}

impl Default for DashboardView {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardView {
    /// An unfiltered view positioned on page 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filter: RecordFilter {
                month: None,
                year: None,
                movement: None,
            },
            page: 1,
        }
    }

    /// The active filter.
    #[must_use]
    pub const fn filter(&self) -> &RecordFilter {
        &self.filter
    }

    /// The requested page (clamping happens at render time).
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Replaces the filter and resets the page to 1.
    pub fn set_filter(&mut self, filter: RecordFilter) {
        self.filter = filter;
        self.page = 1;
    }

    /// Moves to `page`; values below 1 snap to 1, values past the end are
    /// clamped when the view is rendered.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Full recompute over `records`: filtered rows, ledger totals, and the
    /// visible page. Idempotent for a given view state and record set.
    #[must_use]
    pub fn render<'a>(&self, records: &'a [Model]) -> DashboardPage<'a> {
        let filtered = filter_records(records, &self.filter);
        let totals = ledger_totals(&filtered);
        let total_pages = page_count(filtered.len());
        let page = clamp_page(self.page, total_pages);
        let rows = page_slice(&filtered, page).to_vec();

        DashboardPage {
            filtered_count: filtered.len(),
            rows,
            totals,
            page,
            total_pages,
        }
    }
}

/// One rendered dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardPage<'a> {
    /// Number of records matching the filter (across all pages)
    pub filtered_count: usize,
    /// The records visible on the current page
    pub rows: Vec<&'a Model>,
    /// IN/OUT running totals over the whole filtered set
    pub totals: LedgerTotals,
    /// Current page, clamped
    pub page: usize,
    /// Total number of pages; 0 when the filtered set is empty
    pub total_pages: usize,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(
        id: i64,
        item: &str,
        qty: i64,
        movement: Option<Movement>,
        threshold: i64,
        date: Option<(i32, u32, u32)>,
    ) -> Model {
        Model {
            id,
            item: item.to_string(),
            qty,
            movement: movement.map(|m| m.as_str().to_string()),
            threshold,
            category: None,
            remarks: None,
            date: date.map(|(y, m, d)| Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()),
            low_stock: qty <= threshold,
        }
    }

    fn bolt_ledger() -> Vec<Model> {
        vec![
            record(1, "Bolt", 2, Some(Movement::Out), 0, Some((2025, 3, 10))),
            record(2, "Bolt", 10, Some(Movement::In), 0, Some((2025, 3, 12))),
        ]
    }

    #[test]
    fn test_no_filter_matches_everything_dated() {
        let records = bolt_ledger();
        let filtered = filter_records(&records, &RecordFilter::default());
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn test_ledger_totals_partition_by_movement() {
        // OUT 2 + IN 10 with no filter
        let records = bolt_ledger();
        let filtered = filter_records(&records, &RecordFilter::default());
        let totals = ledger_totals(&filtered);
        assert_eq!(totals.in_total, 10);
        assert_eq!(totals.out_total, 2);

        // The partition is exact: both totals together cover every qty
        let qty_sum: i64 = filtered.iter().map(|r| r.qty).sum();
        assert_eq!(totals.in_total + totals.out_total, qty_sum);
    }

    #[test]
    fn test_filter_is_deterministic_and_subset() {
        let records = vec![
            record(1, "Bolt", 2, Some(Movement::Out), 0, Some((2025, 3, 10))),
            record(2, "Nut", 4, Some(Movement::In), 0, Some((2024, 3, 2))),
            record(3, "Washer", 7, None, 5, Some((2025, 7, 1))),
        ];
        let filter = RecordFilter {
            month: Some(3),
            year: Some(2025),
            movement: None,
        };

        let first = filter_records(&records, &filter);
        let second = filter_records(&records, &filter);
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, 1);
        assert!(first.iter().all(|f| records.iter().any(|r| r.id == f.id)));
    }

    #[test]
    fn test_movement_filter_excludes_untagged_records() {
        let records = vec![
            record(1, "Bolt", 2, Some(Movement::In), 0, Some((2025, 3, 10))),
            record(2, "Washer", 7, None, 5, Some((2025, 3, 11))),
        ];
        let filter = RecordFilter {
            month: None,
            year: None,
            movement: Some(Movement::In),
        };

        let filtered = filter_records(&records, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 1);
    }

    #[test]
    fn test_dateless_record_is_skipped_not_fatal() {
        let records = vec![
            record(1, "Bolt", 2, Some(Movement::Out), 0, None),
            record(2, "Bolt", 10, Some(Movement::In), 0, Some((2025, 3, 12))),
        ];
        let filtered = filter_records(&records, &RecordFilter::default());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, 2);
    }

    #[test]
    fn test_snapshot_totals_shortfall() {
        // qty 3 / threshold 5 => shortfall 2; qty 7 / threshold 5 => 0
        let records = vec![
            record(1, "Washer", 3, None, 5, Some((2025, 3, 10))),
            record(2, "Gasket", 7, None, 5, Some((2025, 3, 11))),
        ];
        let filtered = filter_records(&records, &RecordFilter::default());
        let totals = snapshot_totals(&filtered);
        assert_eq!(totals.total_qty, 10);
        assert_eq!(totals.shortfall, 2);
        assert!(totals.shortfall >= 0);
    }

    #[test]
    fn test_snapshot_totals_empty_set() {
        let totals = snapshot_totals(&[]);
        assert_eq!(totals.total_qty, 0);
        assert_eq!(totals.shortfall, 0);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0), 0);
        assert_eq!(page_count(1), 1);
        assert_eq!(page_count(5), 1);
        assert_eq!(page_count(6), 2);
        assert_eq!(page_count(11), 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 3), 1);
        assert_eq!(clamp_page(2, 3), 2);
        assert_eq!(clamp_page(9, 3), 3);
        assert_eq!(clamp_page(7, 0), 1);
    }

    #[test]
    fn test_page_sizes_sum_to_filtered_count() {
        let records: Vec<Model> = (0..13)
            .map(|i| {
                record(
                    i,
                    "Bolt",
                    1,
                    Some(Movement::In),
                    0,
                    Some((2025, 3, 1 + u32::try_from(i).unwrap())),
                )
            })
            .collect();
        let filtered = filter_records(&records, &RecordFilter::default());
        let pages = page_count(filtered.len());
        assert_eq!(pages, 3);

        let mut seen = 0;
        for page in 1..=pages {
            let slice = page_slice(&filtered, page);
            assert!(!slice.is_empty());
            assert!(slice.len() <= PAGE_SIZE);
            seen += slice.len();
        }
        assert_eq!(seen, filtered.len());

        // Last page carries the remainder
        assert_eq!(page_slice(&filtered, pages).len(), 3);
    }

    #[test]
    fn test_dashboard_filter_change_resets_page() {
        let records: Vec<Model> = (0..12)
            .map(|i| record(i, "Bolt", 1, Some(Movement::In), 0, Some((2025, 3, 5))))
            .collect();

        let mut view = DashboardView::new();
        view.set_page(3);
        assert_eq!(view.render(&records).page, 3);

        view.set_filter(RecordFilter {
            month: Some(3),
            year: None,
            movement: None,
        });
        assert_eq!(view.page(), 1);
        let rendered = view.render(&records);
        assert_eq!(rendered.page, 1);
        assert_eq!(rendered.filtered_count, 12);
        assert_eq!(rendered.rows.len(), PAGE_SIZE);
    }

    #[test]
    fn test_dashboard_page_clamps_to_last() {
        let records: Vec<Model> = (0..6)
            .map(|i| record(i, "Bolt", 1, Some(Movement::In), 0, Some((2025, 3, 5))))
            .collect();

        let mut view = DashboardView::new();
        view.set_page(99);
        let rendered = view.render(&records);
        assert_eq!(rendered.total_pages, 2);
        assert_eq!(rendered.page, 2);
        assert_eq!(rendered.rows.len(), 1);
    }

    #[test]
    fn test_dashboard_empty_set_has_no_pages() {
        let view = DashboardView::new();
        let rendered = view.render(&[]);
        assert_eq!(rendered.total_pages, 0);
        assert_eq!(rendered.page, 1);
        assert!(rendered.rows.is_empty());
        assert_eq!(rendered.totals, LedgerTotals::default());
    }
}
