//! Remote object store adapters
//!
//! The engine talks to the bucket through the [`RemoteStore`] trait so the
//! backend can be swapped without touching sync logic. `S3Store` is the
//! production backend; `MemoryStore` backs the test-suite.

mod memory;
mod s3;

pub use memory::MemoryStore;
pub use s3::S3Store;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ObjectKey;

/// Opaque remote key-value surface required by the sync engine
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Write an object, replacing any existing content at the key
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<()>;

    /// Fetch an object's full content
    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>>;

    /// Delete an object. Deleting an absent key is a success: remote state
    /// is the goal, not the transition.
    async fn delete(&self, key: &ObjectKey) -> Result<()>;

    /// Every key in the bucket, across all pages, deduplicated
    async fn list_all_keys(&self) -> Result<Vec<ObjectKey>>;
}
