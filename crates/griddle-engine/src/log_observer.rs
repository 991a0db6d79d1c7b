//! Observer that logs engine notifications and persists checkpoints.
//!
//! Hourly and daily summaries go to structured logging; snapshot
//! checkpoints are written through the [`SnapshotStore`]. A failed save
//! is logged at warn and swallowed -- the in-memory state stays
//! authoritative for the rest of the session.

use tracing::{info, warn};

use griddle_core::EngineObserver;
use griddle_persist::SnapshotStore;
use griddle_types::{Achievement, DayReport, FinalStats, GameSnapshot, HourlyReport};

/// Logging + persistence observer for the automated run.
#[derive(Debug)]
pub struct LogObserver {
    store: SnapshotStore,
}

impl LogObserver {
    /// Create an observer that saves snapshots through `store`.
    pub const fn new(store: SnapshotStore) -> Self {
        Self { store }
    }
}

impl EngineObserver for LogObserver {
    fn on_achievement(&mut self, achievement: Achievement) {
        info!(%achievement, "achievement unlocked");
    }

    fn on_hour(&mut self, report: &HourlyReport) {
        info!(
            day = report.day,
            hour = report.hour,
            balance = %report.balance,
            reputation = %report.reputation,
            capacity = report.capacity,
            new_orders = report.new_orders,
            prepared = report.units_prepared,
            completed = report.orders_completed.len(),
            expired = report.orders_expired.len(),
            queued = report.queue.len(),
            events = report.active_events.len(),
            "hour processed"
        );
    }

    fn on_day_end(&mut self, report: &DayReport) {
        info!(
            day = report.day,
            costs = %report.settlement.total_cost,
            skipped = report.settlement.skipped.len(),
            balance = %report.balance,
            reputation = %report.reputation,
            orders = report.orders_completed,
            "day settled"
        );
    }

    fn on_game_over(&mut self, stats: &FinalStats) {
        info!(
            outcome = %stats.outcome,
            day = stats.day,
            balance = %stats.balance,
            reputation = %stats.reputation,
            orders = stats.orders_completed_total,
            upgrades = stats.upgrades_purchased,
            achievements = stats.achievements.len(),
            "session over"
        );
    }

    fn on_snapshot(&mut self, snapshot: &GameSnapshot) {
        if let Err(err) = self.store.save(snapshot) {
            warn!(%err, path = %self.store.path().display(), "snapshot save failed");
        }
    }
}
