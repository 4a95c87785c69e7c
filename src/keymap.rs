//! Path <-> object key mapping
//!
//! Pure conversion layer between local filesystem paths and remote object
//! keys. The mapping is a bijection modulo the trailing directory-marker
//! slash: `to_local_path(to_key(p)) == p` for every path under the root.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, SyncError};
use crate::types::ObjectKey;

/// Convert a local path under `root` into its remote object key.
///
/// Strips the root prefix and joins the remaining components with `/`
/// regardless of the platform separator. Directories get a trailing `/`.
/// Fails when `path` does not live under `root`.
pub fn to_key(path: &Path, root: &Path, is_directory: bool) -> Result<ObjectKey> {
    let invalid = || SyncError::InvalidPath {
        path: path.to_path_buf(),
        root: root.to_path_buf(),
    };

    let relative = path.strip_prefix(root).map_err(|_| invalid())?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_string_lossy().into_owned()),
            Component::CurDir => {}
            // ParentDir or a fresh root would escape the sync root
            _ => return Err(invalid()),
        }
    }

    // The root itself has no key of its own
    if segments.is_empty() {
        return Err(invalid());
    }

    let mut key = segments.join("/");
    if is_directory {
        key.push('/');
    }
    Ok(ObjectKey::new(key))
}

/// Convert a remote object key back into a local path under `root`.
///
/// Returns the path and whether the key denotes a directory marker.
pub fn to_local_path(key: &ObjectKey, root: &Path) -> (PathBuf, bool) {
    let is_directory = key.is_directory_marker();
    let mut path = root.to_path_buf();
    for segment in key.as_str().split('/').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    (path, is_directory)
}
