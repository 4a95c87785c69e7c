//! Synchronization engine
//!
//! Two independent paths share one remote store and one local root. The
//! immediate path translates filesystem change events into one-off remote
//! actions; the reconciliation path periodically re-lists both sides and
//! converges them. Neither path caches state between runs.

mod engine;
mod translate;

pub use engine::SyncEngine;
pub use translate::{translate, TEMP_FILE_PREFIX};
