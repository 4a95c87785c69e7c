//! Error types for bucketsync

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for bucketsync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Main error type for bucketsync
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("path {path:?} is not under sync root {root:?}")]
    InvalidPath { path: PathBuf, root: PathBuf },

    #[error("remote transfer failed: {0}")]
    Transfer(String),

    #[error("local I/O error: {0}")]
    LocalIo(#[from] std::io::Error),

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SyncError {
    /// Whether this error should terminate the process.
    ///
    /// Only startup conditions qualify: a missing sync root or an
    /// unobtainable watch subscription. Everything else is handled at the
    /// action boundary and repaired by the next reconciliation pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SyncError::Config(_) | SyncError::Watch(_))
    }
}
