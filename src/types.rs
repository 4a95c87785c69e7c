//! Core types for bucketsync

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Identifier of an object in the remote bucket.
///
/// Forward-slash separated, relative to the bucket root. A trailing `/`
/// denotes a directory marker with zero-length content. Every key maps to
/// exactly one local path under the configured root and back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key names a directory rather than a file.
    pub fn is_directory_marker(&self) -> bool {
        self.0.ends_with('/')
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// What happened to a watched path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Deleted,
}

/// A normalized filesystem change notification
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
    pub is_directory: bool,
}

/// The single currency between the engine and the adapters.
///
/// Each action is self-contained and idempotent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    /// Copy a local file's full content to the remote key
    Upload { path: PathBuf, key: ObjectKey },
    /// Write an empty object at a directory-marker key
    CreateRemoteMarker { key: ObjectKey },
    /// Remove the object at the key
    DeleteRemote { key: ObjectKey },
    /// Materialize a remote object at its local path
    DownloadRemote { key: ObjectKey, path: PathBuf },
    /// Remove a local file that no longer exists remotely
    DeleteLocal { path: PathBuf },
}

impl SyncAction {
    /// Short label used as log context
    pub fn kind(&self) -> &'static str {
        match self {
            SyncAction::Upload { .. } => "upload",
            SyncAction::CreateRemoteMarker { .. } => "create_marker",
            SyncAction::DeleteRemote { .. } => "delete_remote",
            SyncAction::DownloadRemote { .. } => "download",
            SyncAction::DeleteLocal { .. } => "delete_local",
        }
    }
}

/// Configuration injected into the engine and adapters at construction
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Target S3 bucket
    pub bucket: String,
    /// Local root directory being mirrored
    pub root: PathBuf,
    /// AWS region override; ambient configuration applies when unset
    pub region: Option<String>,
    /// Delay between reconciliation passes
    pub reconcile_interval: Duration,
}

impl SyncConfig {
    /// Startup validation. The root must exist before any watch
    /// subscription or reconciliation is attempted.
    pub fn validate(&self) -> Result<()> {
        if !self.root.is_dir() {
            return Err(SyncError::Config(format!(
                "sync root {} does not exist",
                self.root.display()
            )));
        }
        Ok(())
    }
}

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    /// Remote objects materialized locally
    pub downloaded: usize,
    /// Local files removed because no remote key matched
    pub deleted_locally: usize,
    /// Per-item failures; the pass continues past each one
    pub errors: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl ReconciliationReport {
    /// True when the pass found both sides already in agreement.
    pub fn is_converged(&self) -> bool {
        self.downloaded == 0 && self.deleted_locally == 0 && self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_marker_detection() {
        assert!(ObjectKey::from("archive/").is_directory_marker());
        assert!(!ObjectKey::from("archive").is_directory_marker());
        assert!(!ObjectKey::from("reports/q1.pdf").is_directory_marker());
    }

    #[test]
    fn validate_rejects_missing_root() {
        let config = SyncConfig {
            bucket: "bucket".into(),
            root: PathBuf::from("/definitely/not/a/real/path"),
            region: None,
            reconcile_interval: Duration::from_secs(300),
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_fatal());
    }
}
