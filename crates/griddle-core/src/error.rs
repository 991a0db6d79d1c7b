//! Error taxonomy for the engine command surface.
//!
//! Commands never panic and never partially apply: every failure is a
//! typed decline that leaves the game state unchanged. Terminal game
//! conditions are not errors -- they surface through reports -- but a
//! command issued *after* the session has ended is declined with
//! [`EngineError::SessionOver`].

use griddle_types::{GameOutcome, UpgradeKind};

/// Errors returned by engine commands.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The session has reached a terminal outcome; no further commands
    /// mutate the game.
    #[error("session is over: {outcome}")]
    SessionOver {
        /// How the session ended.
        outcome: GameOutcome,
    },

    /// A quantity argument was zero.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The recipe id is not in the catalog.
    #[error("unknown recipe: {id}")]
    UnknownRecipe {
        /// The id that was looked up.
        id: String,
    },

    /// The upgrade has already reached its maximum level.
    #[error("upgrade {kind} is already at its maximum level {level}")]
    UpgradeMaxed {
        /// The upgrade that was requested.
        kind: UpgradeKind,
        /// Its current (maximum) level.
        level: u32,
    },

    /// A recipe unlock was requested but every secret recipe is already
    /// unlocked.
    #[error("no secret recipes left to unlock")]
    NoSecretRecipesLeft,

    /// A ledger operation was declined.
    #[error(transparent)]
    Ledger(#[from] griddle_ledger::LedgerError),

    /// A stock operation was declined.
    #[error(transparent)]
    Stock(#[from] griddle_stock::StockError),

    /// A menu lookup failed.
    #[error(transparent)]
    Menu(#[from] griddle_menu::MenuError),

    /// The clock configuration was invalid.
    #[error(transparent)]
    Clock(#[from] crate::clock::ClockError),
}
