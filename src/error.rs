//! Error types for sketch syncing.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while planning or performing a sync.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The examples directory does not exist.
    #[error("Examples directory not found: {0}")]
    ExamplesDirMissing(PathBuf),

    /// A path that must be a directory is something else.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Clearing the destination would delete example sources.
    #[error(
        "Examples and destination overlap ('{}' vs '{}'); refusing to clear the destination",
        .examples.display(),
        .dest.display()
    )]
    Overlap { examples: PathBuf, dest: PathBuf },

    /// I/O error during a filesystem operation.
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Wrap an `io::Error` with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for sync operations.
pub type SyncResult<T> = std::result::Result<T, SyncError>;
