//! The game clock: day counter and working-hours window.
//!
//! The clock is the single source of truth for temporal state. Hours
//! advance one at a time; stepping past the end of the working window
//! hands control to day-end settlement instead of producing a working
//! hour, and the engine then rolls the clock onto the next day.

use serde::{Deserialize, Serialize};

use crate::config::TimeConfig;

/// Errors that can occur when constructing the clock.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The working window or day count is unusable.
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Result of advancing the clock by one hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourAdvance {
    /// A working hour to simulate.
    Working(u32),
    /// The working day is over; settle and roll to the next day.
    EndOfDay,
}

/// Day/hour state for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    day: u32,
    hour: u32,
    working_start: u32,
    working_end: u32,
    max_days: u32,
}

impl GameClock {
    /// Create a clock at day 1, at the start of the working window.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the working window is
    /// empty, extends past midnight, or the day count is zero.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        Self::from_parts(config, 1, config.working_start)
    }

    /// Create a clock at an explicit day and hour (snapshot restore).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] for an invalid window, a
    /// zero day count, or an hour outside the working window.
    pub fn from_parts(config: &TimeConfig, day: u32, hour: u32) -> Result<Self, ClockError> {
        if config.working_start >= config.working_end {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "working_start {} must be before working_end {}",
                    config.working_start, config.working_end
                ),
            });
        }
        if config.working_end > 23 {
            return Err(ClockError::InvalidConfig {
                reason: format!("working_end {} is past 23:00", config.working_end),
            });
        }
        if config.days == 0 {
            return Err(ClockError::InvalidConfig {
                reason: String::from("days must be at least 1"),
            });
        }
        if day == 0 {
            return Err(ClockError::InvalidConfig {
                reason: String::from("day is 1-based"),
            });
        }
        if hour < config.working_start || hour > config.working_end {
            return Err(ClockError::InvalidConfig {
                reason: format!(
                    "hour {hour} outside working window {}..={}",
                    config.working_start, config.working_end
                ),
            });
        }
        Ok(Self {
            day,
            hour,
            working_start: config.working_start,
            working_end: config.working_end,
            max_days: config.days,
        })
    }

    /// Current in-game day, 1-based.
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Current hour of day.
    pub const fn hour(&self) -> u32 {
        self.hour
    }

    /// First working hour of the day.
    pub const fn working_start(&self) -> u32 {
        self.working_start
    }

    /// Last working hour of the day.
    pub const fn working_end(&self) -> u32 {
        self.working_end
    }

    /// The configured session length in days.
    pub const fn max_days(&self) -> u32 {
        self.max_days
    }

    /// Whether the current day is the final configured day.
    pub const fn is_final_day(&self) -> bool {
        self.day >= self.max_days
    }

    /// Advance one hour.
    ///
    /// Returns [`HourAdvance::Working`] with the new hour while inside
    /// the working window, or [`HourAdvance::EndOfDay`] once the window
    /// is exhausted. After `EndOfDay` the clock stays put until
    /// [`GameClock::start_next_day`] is called.
    pub const fn advance_hour(&mut self) -> HourAdvance {
        let next = self.hour.saturating_add(1);
        if next > self.working_end {
            HourAdvance::EndOfDay
        } else {
            self.hour = next;
            HourAdvance::Working(next)
        }
    }

    /// Roll onto the next day, resetting the hour to the window start.
    /// Returns the new day number.
    pub const fn start_next_day(&mut self) -> u32 {
        self.day = self.day.saturating_add(1);
        self.hour = self.working_start;
        self.day
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn window(start: u32, end: u32, days: u32) -> TimeConfig {
        TimeConfig {
            working_start: start,
            working_end: end,
            days,
        }
    }

    #[test]
    fn clock_starts_at_window_open() {
        let clock = GameClock::new(&window(8, 20, 7)).unwrap();
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.hour(), 8);
        assert!(!clock.is_final_day());
    }

    #[test]
    fn hours_advance_until_end_of_day() {
        let mut clock = GameClock::new(&window(8, 10, 7)).unwrap();
        assert_eq!(clock.advance_hour(), HourAdvance::Working(9));
        assert_eq!(clock.advance_hour(), HourAdvance::Working(10));
        assert_eq!(clock.advance_hour(), HourAdvance::EndOfDay);
        // Stays at end-of-day until the next day starts.
        assert_eq!(clock.advance_hour(), HourAdvance::EndOfDay);
        assert_eq!(clock.hour(), 10);
    }

    #[test]
    fn next_day_resets_the_hour() {
        let mut clock = GameClock::new(&window(8, 10, 2)).unwrap();
        let _ = clock.advance_hour();
        let _ = clock.advance_hour();
        let _ = clock.advance_hour();
        assert_eq!(clock.start_next_day(), 2);
        assert_eq!(clock.hour(), 8);
        assert!(clock.is_final_day());
    }

    #[test]
    fn invalid_windows_are_rejected() {
        assert!(GameClock::new(&window(20, 8, 7)).is_err());
        assert!(GameClock::new(&window(8, 8, 7)).is_err());
        assert!(GameClock::new(&window(8, 24, 7)).is_err());
        assert!(GameClock::new(&window(8, 20, 0)).is_err());
    }

    #[test]
    fn restore_validates_hour_inside_window() {
        let config = window(8, 20, 7);
        assert!(GameClock::from_parts(&config, 3, 14).is_ok());
        assert!(GameClock::from_parts(&config, 3, 7).is_err());
        assert!(GameClock::from_parts(&config, 0, 14).is_err());
    }
}
