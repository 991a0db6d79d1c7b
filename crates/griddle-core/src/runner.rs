//! Bounded game loop with operator controls.
//!
//! [`run_game`] drives [`GameEngine::advance_hour`] until the session
//! reaches a terminal outcome or an operator stops it. The shared
//! [`ControlState`] gives the caller pause/resume, a runtime-adjustable
//! hour interval, and a clean stop -- all atomics plus a [`Notify`], so
//! the loop's hot path takes no locks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::info;

use griddle_types::FinalStats;

use crate::engine::{GameEngine, HourOutcome};
use crate::error::EngineError;

/// Why the run loop returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEnd {
    /// The session reached a terminal outcome.
    Completed(FinalStats),
    /// An operator stop was requested; the game can be resumed later
    /// from its last snapshot.
    Stopped,
}

/// Shared control state between the run loop and its operator.
#[derive(Debug)]
pub struct ControlState {
    paused: AtomicBool,
    resume_notify: Notify,
    stop_requested: AtomicBool,
    hour_interval_ms: AtomicU64,
}

impl ControlState {
    /// Create a control state with the given hour interval.
    pub const fn new(hour_interval_ms: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::const_new(),
            stop_requested: AtomicBool::new(false),
            hour_interval_ms: AtomicU64::new(hour_interval_ms),
        }
    }

    /// Whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the loop before its next hour.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume a paused loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until no longer paused. Returns immediately if not paused.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume_notify.notified().await;
        }
    }

    /// Request a clean stop before the next hour.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        // A paused loop must wake to observe the stop.
        self.resume_notify.notify_one();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Current delay between simulated hours, in milliseconds.
    pub fn hour_interval_ms(&self) -> u64 {
        self.hour_interval_ms.load(Ordering::Acquire)
    }

    /// Adjust the delay between simulated hours.
    pub fn set_hour_interval_ms(&self, ms: u64) {
        self.hour_interval_ms.store(ms, Ordering::Release);
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Drive the engine hour by hour until the session ends or the operator
/// stops it.
///
/// # Errors
///
/// Propagates any [`EngineError`] from `advance_hour`; a well-formed
/// game only ends via [`RunEnd`].
pub async fn run_game(
    engine: &mut GameEngine,
    control: &Arc<ControlState>,
) -> Result<RunEnd, EngineError> {
    info!(
        day = engine.day(),
        hour = engine.hour(),
        "run loop starting"
    );
    // Record the starting state so a fresh game is resumable even if the
    // process dies during the first hour.
    engine.checkpoint().await;

    loop {
        if control.is_paused() {
            info!("run loop paused");
            control.wait_if_paused().await;
            info!("run loop resumed");
        }

        if control.is_stop_requested() {
            info!("operator stop requested");
            engine.checkpoint().await;
            return Ok(RunEnd::Stopped);
        }

        match engine.advance_hour().await? {
            HourOutcome::Finished(stats) => {
                return Ok(RunEnd::Completed(stats));
            }
            HourOutcome::Hour(_) | HourOutcome::DayEnded(_) => {}
        }

        let interval = control.hour_interval_ms();
        if interval > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_state_toggles() {
        let control = ControlState::new(250);
        assert!(!control.is_paused());
        control.pause();
        assert!(control.is_paused());
        control.resume();
        assert!(!control.is_paused());

        assert_eq!(control.hour_interval_ms(), 250);
        control.set_hour_interval_ms(0);
        assert_eq!(control.hour_interval_ms(), 0);

        assert!(!control.is_stop_requested());
        control.request_stop();
        assert!(control.is_stop_requested());
    }

    #[tokio::test]
    async fn wait_if_paused_returns_immediately_when_running() {
        let control = ControlState::new(0);
        control.wait_if_paused().await;
    }
}
