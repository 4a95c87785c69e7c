//! Filesystem watch adapter
//!
//! Bridges notify's callback-based watcher onto an async channel of
//! normalized [`ChangeEvent`]s. The subscription lives as long as the
//! returned [`FsWatcher`]; dropping it stops event delivery.

use std::path::Path;

use notify::event::{CreateKind, ModifyKind, RemoveKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::Result;
use crate::types::{ChangeEvent, ChangeKind};

/// Capacity of the channel between notify's thread and the sync worker
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Owns the OS watch subscription
pub struct FsWatcher {
    _watcher: RecommendedWatcher,
}

impl FsWatcher {
    /// Subscribe to recursive change notifications under `root`.
    ///
    /// Fails only when no notification stream can be obtained at all,
    /// which callers treat as fatal.
    pub fn subscribe(root: &Path) -> Result<(Self, mpsc::Receiver<ChangeEvent>)> {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let mut watcher =
            notify::recommended_watcher(move |result: notify::Result<Event>| match result {
                Ok(event) => {
                    for change in normalize(event) {
                        if tx.blocking_send(change).is_err() {
                            // Receiver dropped; shutdown in progress
                            return;
                        }
                    }
                }
                Err(e) => warn!(error = %e, "watch backend error"),
            })?;

        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok((Self { _watcher: watcher }, rx))
    }
}

/// Flatten one raw notify event into normalized change events.
///
/// Renames arrive as name-modify events and are dropped here; the next
/// reconciliation pass converges both sides of a rename.
fn normalize(event: Event) -> Vec<ChangeEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(ModifyKind::Name(_)) => return Vec::new(),
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Deleted,
        _ => return Vec::new(),
    };

    event
        .paths
        .iter()
        .map(|path| ChangeEvent {
            kind,
            path: path.clone(),
            is_directory: directoryness(&event.kind, path),
        })
        .collect()
}

/// Whether the event concerns a directory.
///
/// The backend says so for create/remove on platforms that distinguish;
/// otherwise the path is probed while it still exists. A removal of
/// unknown kind falls back to "file".
fn directoryness(kind: &EventKind, path: &Path) -> bool {
    match kind {
        EventKind::Create(CreateKind::Folder) | EventKind::Remove(RemoveKind::Folder) => true,
        EventKind::Create(CreateKind::File) | EventKind::Remove(RemoveKind::File) => false,
        EventKind::Remove(_) => false,
        _ => path.is_dir(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn raw(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn create_file_maps_to_created() {
        let events = normalize(raw(EventKind::Create(CreateKind::File), "/tmp/a.txt"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Created);
        assert!(!events[0].is_directory);
    }

    #[test]
    fn create_folder_is_flagged_as_directory() {
        let events = normalize(raw(EventKind::Create(CreateKind::Folder), "/tmp/dir"));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Created);
        assert!(events[0].is_directory);
    }

    #[test]
    fn remove_folder_keeps_directory_flag() {
        // The path is gone by the time the event arrives; the flag must
        // come from the event kind, not a filesystem probe.
        let events = normalize(raw(
            EventKind::Remove(RemoveKind::Folder),
            "/tmp/no-longer-there",
        ));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Deleted);
        assert!(events[0].is_directory);
    }

    #[test]
    fn remove_of_unknown_kind_defaults_to_file() {
        let events = normalize(raw(EventKind::Remove(RemoveKind::Any), "/tmp/gone"));
        assert_eq!(events.len(), 1);
        assert!(!events[0].is_directory);
    }

    #[test]
    fn data_modification_maps_to_modified() {
        use notify::event::DataChange;
        let events = normalize(raw(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/tmp/a.txt",
        ));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, ChangeKind::Modified);
    }

    #[test]
    fn renames_are_dropped() {
        use notify::event::RenameMode;
        let events = normalize(raw(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            "/tmp/old.txt",
        ));
        assert!(events.is_empty());
    }

    #[test]
    fn access_events_are_dropped() {
        use notify::event::AccessKind;
        let events = normalize(raw(EventKind::Access(AccessKind::Read), "/tmp/a.txt"));
        assert!(events.is_empty());
    }
}
