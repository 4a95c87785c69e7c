//! Sync engine: immediate actions and the reconciliation pass

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::error::Result;
use crate::keymap;
use crate::localfs::LocalFs;
use crate::store::RemoteStore;
use crate::types::{ObjectKey, ReconciliationReport, SyncAction, SyncConfig};

/// Orchestrates both sync paths against one remote store and one local root.
///
/// Holds no index of remote or local state: every reconciliation pass
/// re-lists both sides from scratch, so the two paths need no coordination.
pub struct SyncEngine {
    config: SyncConfig,
    remote: Arc<dyn RemoteStore>,
    local: LocalFs,
}

impl SyncEngine {
    pub fn new(config: SyncConfig, remote: Arc<dyn RemoteStore>) -> Self {
        Self {
            config,
            remote,
            local: LocalFs,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Apply one sync action.
    ///
    /// Exactly one remote or local mutation per action. Failures are
    /// returned to the caller; nothing is retried here - the next
    /// reconciliation pass picks up whatever an action left undone.
    pub async fn apply(&self, action: &SyncAction) -> Result<()> {
        match action {
            SyncAction::Upload { path, key } => {
                let bytes = self.local.read(path).await?;
                self.remote.put(key, bytes).await?;
                info!(key = %key, path = %path.display(), "uploaded");
            }
            SyncAction::CreateRemoteMarker { key } => {
                // Zero-length body; re-creating an existing marker is a no-op
                self.remote.put(key, Vec::new()).await?;
                info!(key = %key, "created directory marker");
            }
            SyncAction::DeleteRemote { key } => {
                self.remote.delete(key).await?;
                info!(key = %key, "deleted remote object");
            }
            SyncAction::DownloadRemote { key, path } => {
                if key.is_directory_marker() {
                    // The marker's content is empty; materializing the
                    // directory is the whole download.
                    self.local.create_dir_all(path).await?;
                } else {
                    let bytes = self.remote.get(key).await?;
                    self.local.write(path, &bytes).await?;
                }
                info!(key = %key, path = %path.display(), "downloaded");
            }
            SyncAction::DeleteLocal { path } => {
                self.local.remove_file(path).await?;
                info!(path = %path.display(), "deleted local file");
            }
        }
        Ok(())
    }

    /// Run one reconciliation pass: list both sides, compute the symmetric
    /// difference, execute it.
    ///
    /// Downloads run before local deletions so a key momentarily missing
    /// from a paginated listing cannot cost data a download would have
    /// restored. Per-item failures are recorded in the report and do not
    /// abort the batch.
    pub async fn reconcile(&self) -> Result<ReconciliationReport> {
        let started_at = Utc::now();

        // Snapshot both sides from ground truth
        let remote_keys = self.remote.list_all_keys().await?;
        let local_files = self.local.walk(&self.config.root).await?;

        let (downloads, deletions) = self.plan(&remote_keys, &local_files)?;

        let mut report = ReconciliationReport {
            downloaded: 0,
            deleted_locally: 0,
            errors: Vec::new(),
            started_at,
            completed_at: started_at,
        };

        for action in &downloads {
            match self.apply(action).await {
                Ok(()) => report.downloaded += 1,
                Err(e) => {
                    warn!(action = action.kind(), error = %e, "reconcile step failed");
                    report.errors.push(format!("{}: {e}", action.kind()));
                }
            }
        }

        for action in &deletions {
            match self.apply(action).await {
                Ok(()) => report.deleted_locally += 1,
                Err(e) => {
                    warn!(action = action.kind(), error = %e, "reconcile step failed");
                    report.errors.push(format!("{}: {e}", action.kind()));
                }
            }
        }

        report.completed_at = Utc::now();
        info!(
            downloaded = report.downloaded,
            deleted = report.deleted_locally,
            errors = report.errors.len(),
            "reconciliation pass complete"
        );
        Ok(report)
    }

    /// Planning step over the two listings.
    ///
    /// Remote keys with no local counterpart become downloads; local files
    /// whose mapped key is absent remotely become deletions.
    fn plan(
        &self,
        remote_keys: &[ObjectKey],
        local_files: &[PathBuf],
    ) -> Result<(Vec<SyncAction>, Vec<SyncAction>)> {
        let root = &self.config.root;
        let remote_set: HashSet<&ObjectKey> = remote_keys.iter().collect();

        let mut local_entries = Vec::with_capacity(local_files.len());
        let mut local_keys = HashSet::with_capacity(local_files.len());
        for path in local_files {
            let key = keymap::to_key(path, root, false)?;
            local_keys.insert(key.clone());
            local_entries.push((path, key));
        }

        let mut downloads = Vec::new();
        for key in remote_keys {
            let (path, is_directory) = keymap::to_local_path(key, root);
            let missing = if is_directory {
                !path.is_dir()
            } else {
                !local_keys.contains(key)
            };
            if missing {
                downloads.push(SyncAction::DownloadRemote {
                    key: key.clone(),
                    path,
                });
            }
        }

        let mut deletions = Vec::new();
        for (path, key) in local_entries {
            if remote_set.contains(&key) {
                continue;
            }
            // The comparison is made on the normalized key form only; a
            // match anywhere in the raw listing vetoes the delete, so a
            // separator or formatting mismatch can never become data loss.
            if remote_keys.iter().any(|remote| remote == &key) {
                continue;
            }
            deletions.push(SyncAction::DeleteLocal { path: path.clone() });
        }

        Ok((downloads, deletions))
    }
}
