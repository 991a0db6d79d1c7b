//! Best-effort JSON snapshot persistence.
//!
//! The engine writes a [`GameSnapshot`] at defined checkpoints (end of
//! hour, end of day, upgrade purchase). Persistence is outside the
//! transactional boundary: a crash between a mutation and its snapshot
//! loses at most the unsaved actions. Save failures are reported to the
//! caller, which logs and swallows them -- the in-memory state stays
//! authoritative for the rest of the session.
//!
//! Writes go to a temporary file in the same directory followed by a
//! rename, so an interrupted save never truncates the last good snapshot.

pub mod store;

pub use store::SnapshotStore;

/// Errors that can occur while saving or loading snapshots.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Filesystem-level failure.
    #[error("snapshot I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The snapshot file exists but does not parse.
    #[error("snapshot is corrupt: {source}")]
    Corrupt {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// No snapshot has been saved at the configured path.
    #[error("no snapshot found at {path}")]
    NotFound {
        /// The path that was checked.
        path: String,
    },
}
