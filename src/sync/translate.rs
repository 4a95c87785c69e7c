//! Change-event translation
//!
//! Turns one filesystem notification into at most one [`SyncAction`].
//! Stateless: each event is judged on its own against the live filesystem.

use std::path::Path;

use crate::error::Result;
use crate::keymap;
use crate::types::{ChangeEvent, ChangeKind, SyncAction, SyncConfig};

/// Files carrying this name prefix are editor lock files and are never
/// uploaded.
pub const TEMP_FILE_PREFIX: &str = "~$";

fn is_temp_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with(TEMP_FILE_PREFIX))
        .unwrap_or(false)
}

/// Translate one change notification into at most one sync action.
///
/// Existence is re-checked here rather than at notification time: delivery
/// is not instantaneous and the path may already be gone or replaced. A
/// stale event dissolves to `None`, not an error.
pub fn translate(event: &ChangeEvent, config: &SyncConfig) -> Result<Option<SyncAction>> {
    match (event.kind, event.is_directory) {
        (ChangeKind::Created, true) => {
            let key = keymap::to_key(&event.path, &config.root, true)?;
            Ok(Some(SyncAction::CreateRemoteMarker { key }))
        }
        (ChangeKind::Created | ChangeKind::Modified, false) => {
            if is_temp_file(&event.path) {
                tracing::debug!(path = %event.path.display(), "skipping temporary file");
                return Ok(None);
            }
            if !event.path.exists() {
                return Ok(None);
            }
            let key = keymap::to_key(&event.path, &config.root, false)?;
            Ok(Some(SyncAction::Upload {
                path: event.path.clone(),
                key,
            }))
        }
        // Directory content changes arrive as events on the entries themselves
        (ChangeKind::Modified, true) => Ok(None),
        (ChangeKind::Deleted, is_directory) => {
            let key = keymap::to_key(&event.path, &config.root, is_directory)?;
            Ok(Some(SyncAction::DeleteRemote { key }))
        }
    }
}
