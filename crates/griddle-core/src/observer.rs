//! The observer interface the engine notifies.
//!
//! The presentation and persistence layers subscribe by implementing
//! [`EngineObserver`]; the engine holds the observer and invokes it
//! synchronously, never waiting for acknowledgment. All methods default
//! to no-ops so an observer implements only what it consumes.

use griddle_types::{
    Achievement, DayReport, FinalStats, GameSnapshot, HourlyReport,
};

/// One-way notifications out of the engine.
pub trait EngineObserver: Send {
    /// An achievement was unlocked.
    fn on_achievement(&mut self, _achievement: Achievement) {}

    /// A working hour finished processing.
    fn on_hour(&mut self, _report: &HourlyReport) {}

    /// A day was settled.
    fn on_day_end(&mut self, _report: &DayReport) {}

    /// The session reached a terminal outcome.
    fn on_game_over(&mut self, _stats: &FinalStats) {}

    /// A snapshot checkpoint was reached (end of hour, end of day,
    /// upgrade purchase). Persistence subscribers save it here; failures
    /// are theirs to log and swallow.
    fn on_snapshot(&mut self, _snapshot: &GameSnapshot) {}
}

/// An observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl EngineObserver for NoOpObserver {}
