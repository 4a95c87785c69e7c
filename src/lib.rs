//! Bucketsync - local folder to S3 mirroring
//!
//! Watches a directory tree, propagates changes to an S3 bucket as they
//! happen, and periodically reconciles both sides from ground truth.

pub mod error;
pub mod keymap;
pub mod localfs;
pub mod store;
pub mod sync;
pub mod types;
pub mod watch;

pub use error::{Result, SyncError};
pub use sync::SyncEngine;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
