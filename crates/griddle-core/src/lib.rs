//! Simulation core for the griddle restaurant game.
//!
//! This crate owns the hourly state machine: the game clock, random
//! events, customer order arrivals, kitchen production, reputation,
//! upgrades, achievements, and the [`GameEngine`] command surface that
//! ties them to the ledger, stock store, and menu catalog.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with defaults for every field
//! - [`clock`] -- day counter and working-hours window
//! - [`events`] -- random event triggering, effects, and expiry
//! - [`orders`] -- order board, arrival rolls, concurrent order creation
//! - [`engine`] -- the aggregate root and its commands
//! - [`runner`] -- bounded run loop with pause/stop controls
//! - [`observer`] -- one-way notification interface

pub mod achievements;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
mod kitchen;
pub mod observer;
pub mod orders;
pub mod reputation;
pub mod runner;
pub mod upgrades;

pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, HourOutcome, IngredientPurchase, NewGameParams, UpgradePurchase};
pub use error::EngineError;
pub use observer::{EngineObserver, NoOpObserver};
pub use runner::{run_game, ControlState, RunEnd};
