//! Snapshot save/load against a single JSON file.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use griddle_types::GameSnapshot;

use crate::PersistError;

/// A snapshot store bound to one file path.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    /// Create a store that saves to (and loads from) `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The configured snapshot path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a snapshot exists at the configured path.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write a snapshot.
    ///
    /// The JSON is written to a sibling temporary file first and renamed
    /// into place, so an interrupted save leaves the previous snapshot
    /// intact.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Io`] on filesystem failure. Serialization
    /// of [`GameSnapshot`] itself cannot fail for well-formed state, but a
    /// serializer error is surfaced as [`PersistError::Corrupt`].
    pub fn save(&self, snapshot: &GameSnapshot) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), day = snapshot.day, hour = snapshot.hour, "snapshot saved");
        Ok(())
    }

    /// Load the snapshot at the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::NotFound`] when no file exists,
    /// [`PersistError::Io`] on read failure, or [`PersistError::Corrupt`]
    /// when the file does not parse as a [`GameSnapshot`].
    pub fn load(&self) -> Result<GameSnapshot, PersistError> {
        if !self.path.exists() {
            return Err(PersistError::NotFound {
                path: self.path.display().to_string(),
            });
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let snapshot: GameSnapshot = serde_json::from_str(&contents)?;
        info!(
            path = %self.path.display(),
            day = snapshot.day,
            hour = snapshot.hour,
            "snapshot loaded"
        );
        Ok(snapshot)
    }
}
