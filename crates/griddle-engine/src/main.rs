//! Automated run binary for the griddle restaurant simulation.
//!
//! Wires configuration, the engine, the logging/persistence observer,
//! and the run loop together, then plays the session to completion.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `griddle.yaml` (or the first argument)
//! 3. Resume the saved session if a snapshot exists, else start fresh
//! 4. Run the hour loop until victory, defeat, or operator stop
//! 5. Log the final outcome

mod log_observer;

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use griddle_core::{
    run_game, ControlState, GameConfig, GameEngine, NewGameParams, RunEnd,
};
use griddle_persist::SnapshotStore;
use griddle_types::Difficulty;

/// Default configuration file name, next to the binary's working dir.
const DEFAULT_CONFIG_PATH: &str = "griddle.yaml";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("griddle-engine starting");

    let config = load_config();
    info!(
        days = config.time.days,
        working_start = config.time.working_start,
        working_end = config.time.working_end,
        seed = config.gameplay.seed,
        "configuration loaded"
    );

    let store = SnapshotStore::new(config.persistence.save_path.clone());
    let hour_interval_ms = config.gameplay.hour_interval_ms;
    let mut engine = build_engine(config, &store)?;

    let control = Arc::new(ControlState::new(hour_interval_ms));
    match run_game(&mut engine, &control).await? {
        RunEnd::Completed(stats) => {
            info!(outcome = %stats.outcome, day = stats.day, balance = %stats.balance, "run complete");
        }
        RunEnd::Stopped => {
            info!("run stopped by operator");
        }
    }

    Ok(())
}

/// Load configuration from the first argument or the default path,
/// falling back to built-in defaults when no file exists.
fn load_config() -> GameConfig {
    let path_arg = std::env::args().nth(1);
    let path_text = path_arg.unwrap_or_else(|| String::from(DEFAULT_CONFIG_PATH));
    let path = Path::new(&path_text);

    if path.exists() {
        match GameConfig::from_file(path) {
            Ok(config) => return config,
            Err(err) => {
                warn!(%err, path = path_text, "config unreadable, using defaults");
            }
        }
    } else {
        info!(path = path_text, "no config file, using defaults");
    }
    GameConfig::default()
}

/// Resume the saved session when a snapshot exists, else start fresh.
///
/// A corrupt or stale snapshot is logged and a new game started in its
/// place; it will be overwritten at the first checkpoint.
fn build_engine(
    config: GameConfig,
    store: &SnapshotStore,
) -> Result<GameEngine, griddle_core::EngineError> {
    let observer = Box::new(log_observer::LogObserver::new(store.clone()));

    if store.exists() {
        match store.load() {
            Ok(snapshot) => {
                info!(day = snapshot.day, hour = snapshot.hour, "resuming saved session");
                match GameEngine::load_game(config.clone(), snapshot, observer) {
                    Ok(engine) => return Ok(engine),
                    Err(err) => {
                        warn!(%err, "saved session unusable, starting a new game");
                    }
                }
            }
            Err(err) => {
                warn!(%err, "snapshot unreadable, starting a new game");
            }
        }
    }

    let observer = Box::new(log_observer::LogObserver::new(store.clone()));
    let params = NewGameParams {
        player_name: env_or("GRIDDLE_PLAYER", "Player"),
        restaurant_name: env_or("GRIDDLE_RESTAURANT", "Griddle House"),
        difficulty: env_or("GRIDDLE_DIFFICULTY", "normal")
            .parse()
            .unwrap_or(Difficulty::Normal),
    };
    GameEngine::new_game(config, params, observer)
}

/// Read an environment variable with a default.
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| String::from(default))
}
