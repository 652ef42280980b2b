//! Low-stock monitoring: suppression state machine and polling loop.
//!
//! The monitor scans the full ledger on a fixed cadence, compares each
//! record's quantity against its threshold, and emits at most one alert
//! per record per low-stock episode. The suppression map is owned by the
//! monitor and threaded explicitly through the scan functions, so the
//! state machine is unit-testable without a store, a clock, or a network.
//!
//! Per-record state machine:
//! - `Normal` -> `Low` when `qty <= threshold` is first observed; an alert
//!   candidate is emitted.
//! - `Low` -> `Notified` once the alert is actually delivered. A failed
//!   delivery leaves the record in `Low`, so the next scan re-emits it
//!   (retry granularity is the poll tick, no backoff).
//! - `Notified` stays silent while the quantity remains at or below the
//!   threshold.
//! - Any state -> `Normal` when the quantity rises strictly above the
//!   threshold, re-arming alerts for the next dip.

use crate::{
    core::record,
    entities::stock_record::Model,
    errors::Result,
    notify::MailRelayClient,
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Alert state of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertState {
    /// Quantity above threshold
    #[default]
    Normal,
    /// At or below threshold, alert not yet delivered
    Low,
    /// At or below threshold, alert delivered; suppressed until recovery
    Notified,
}

/// Per-record alert states, keyed by record id.
///
/// Owned exclusively by the monitor; the aggregation path never sees it.
#[derive(Debug, Default)]
pub struct SuppressionMap {
    states: HashMap<i64, AlertState>,
}

impl SuppressionMap {
    /// An empty map: every record starts out `Normal`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of a record; unknown ids are `Normal`.
    #[must_use]
    pub fn state_of(&self, record_id: i64) -> AlertState {
        self.states.get(&record_id).copied().unwrap_or_default()
    }

    /// Marks a delivered alert, suppressing repeats until recovery.
    pub fn mark_notified(&mut self, record_id: i64) {
        self.states.insert(record_id, AlertState::Notified);
    }

    fn set(&mut self, record_id: i64, state: AlertState) {
        self.states.insert(record_id, state);
    }

    /// Drops state for records no longer present in the store.
    fn retain_live(&mut self, live: &HashSet<i64>) {
        self.states.retain(|id, _| live.contains(id));
    }
}

/// An alert candidate for one low-stock record. Serialized as the webhook
/// payload (`record_id` is internal and stays out of it).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockAlert {
    /// Store id of the record, for suppression bookkeeping
    #[serde(skip)]
    pub record_id: i64,
    /// Item display name
    pub item: String,
    /// Quantity at scan time
    pub quantity: i64,
    /// The record's reorder threshold
    pub threshold: i64,
    /// Human-readable alert text
    pub message: String,
}

impl LowStockAlert {
    fn for_record(record: &Model) -> Self {
        Self {
            record_id: record.id,
            item: record.item.clone(),
            quantity: record.qty,
            threshold: record.threshold,
            message: format!(
                "Low stock alert for item {}: Quantity is {} at or below threshold {}.",
                record.item, record.qty, record.threshold
            ),
        }
    }
}

/// Advances the state machine over one scan of the record set and returns
/// the alerts that should be delivered.
///
/// Emits for records in `Normal` or `Low` whose quantity is at or below
/// threshold; `Notified` records stay suppressed. Callers must invoke
/// [`SuppressionMap::mark_notified`] for each alert that was actually
/// delivered, otherwise the record is re-emitted on the next scan.
pub fn plan_alerts(records: &[Model], states: &mut SuppressionMap) -> Vec<LowStockAlert> {
    let live: HashSet<i64> = records.iter().map(|r| r.id).collect();
    states.retain_live(&live);

    let mut alerts = Vec::new();
    for record in records {
        if record::is_low_stock(record.qty, record.threshold) {
            if states.state_of(record.id) != AlertState::Notified {
                states.set(record.id, AlertState::Low);
                alerts.push(LowStockAlert::for_record(record));
            }
        } else {
            states.set(record.id, AlertState::Normal);
        }
    }
    alerts
}

/// Destination for low-stock alerts (the webhook in production, a fake in
/// tests).
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Delivers one alert; an `Err` leaves the record unsuppressed so it
    /// is retried on the next scan.
    async fn deliver(&self, alert: &LowStockAlert) -> Result<()>;
}

/// The polling low-stock monitor.
pub struct LowStockMonitor {
    db: DatabaseConnection,
    sink: Arc<dyn AlertSink>,
    mailer: Option<MailRelayClient>,
    poll_interval: Duration,
    states: SuppressionMap,
}

impl LowStockMonitor {
    /// Creates a monitor over `db` that delivers through `sink`, mirroring
    /// alerts to `mailer` when one is configured.
    #[must_use]
    pub fn new(
        db: DatabaseConnection,
        sink: Arc<dyn AlertSink>,
        mailer: Option<MailRelayClient>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            db,
            sink,
            mailer,
            poll_interval,
            states: SuppressionMap::new(),
        }
    }

    /// Runs the polling loop until `shutdown` changes.
    ///
    /// The first scan fires immediately, then every `poll_interval`. A scan
    /// is awaited to completion inside the loop, so scans never overlap: a
    /// slow store stretches the cycle instead (`MissedTickBehavior::Delay`).
    /// A failed scan is logged and the loop keeps going. On shutdown the
    /// in-flight scan, if any, finishes first.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(interval = ?self.poll_interval, "low-stock monitor started");

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.scan_once().await {
                        warn!(error = %e, "low-stock scan failed");
                    }
                }
                _ = shutdown.changed() => {
                    info!("low-stock monitor stopping");
                    break;
                }
            }
        }
    }

    /// One full scan: fetch the ledger, repair stale `low_stock` flags,
    /// plan alerts, and deliver them.
    pub async fn scan_once(&mut self) -> Result<()> {
        let records = record::get_all_records(&self.db).await?;

        // The write path maintains the flag; repair anything that slipped
        // through (rows written by clients that did not).
        for r in &records {
            if r.low_stock != record::is_low_stock(r.qty, r.threshold) {
                if let Err(e) = record::refresh_low_stock_flag(&self.db, r.id).await {
                    warn!(record_id = r.id, error = %e, "failed to repair low_stock flag");
                }
            }
        }

        let alerts = plan_alerts(&records, &mut self.states);
        for alert in alerts {
            match self.sink.deliver(&alert).await {
                Ok(()) => {
                    info!(item = %alert.item, qty = alert.quantity, "low-stock alert delivered");
                    self.states.mark_notified(alert.record_id);
                    self.mail_alert(&alert).await;
                }
                Err(e) => {
                    warn!(item = %alert.item, error = %e, "alert delivery failed, retrying next scan");
                }
            }
        }
        Ok(())
    }

    /// Mirrors a delivered alert to the mail relay. Mail failures are
    /// logged only; they never affect suppression state.
    async fn mail_alert(&self, alert: &LowStockAlert) {
        let Some(mailer) = &self.mailer else {
            return;
        };
        let subject = format!("Low stock: {}", alert.item);
        if let Err(e) = mailer.send(&subject, &alert.message).await {
            warn!(item = %alert.item, error = %e, "alert mail failed");
        }
    }
}
