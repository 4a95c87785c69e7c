//! In-memory remote store
//!
//! Implements the same contract as [`S3Store`](super::S3Store) over a
//! mutex-guarded map. Backs the test-suite and local experimentation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::RemoteStore;
use crate::error::{Result, SyncError};
use crate::types::ObjectKey;

/// Remote store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<ObjectKey, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object directly, bypassing the trait
    pub fn insert(&self, key: impl Into<ObjectKey>, bytes: impl Into<Vec<u8>>) {
        self.objects.lock().insert(key.into(), bytes.into());
    }

    pub fn contains(&self, key: &ObjectKey) -> bool {
        self.objects.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().is_empty()
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<()> {
        self.objects.lock().insert(key.clone(), bytes);
        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        self.objects
            .lock()
            .get(key)
            .cloned()
            .ok_or_else(|| SyncError::Transfer(format!("no such key: {key}")))
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        self.objects.lock().remove(key);
        Ok(())
    }

    async fn list_all_keys(&self) -> Result<Vec<ObjectKey>> {
        Ok(self.objects.lock().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_get_delete_cycle() {
        let store = MemoryStore::new();
        let key = ObjectKey::from("notes.txt");

        store.put(&key, b"hello".to_vec()).await.unwrap();
        assert_eq!(store.get(&key).await.unwrap(), b"hello");

        store.delete(&key).await.unwrap();
        assert!(store.get(&key).await.is_err());
    }

    #[tokio::test]
    async fn delete_of_absent_key_succeeds() {
        let store = MemoryStore::new();
        store.delete(&ObjectKey::from("never-existed")).await.unwrap();
    }

    #[tokio::test]
    async fn listing_is_deduplicated_and_complete() {
        let store = MemoryStore::new();
        store.insert("a.txt", b"1".as_slice());
        store.insert("b/c.txt", b"2".as_slice());
        store.insert("a.txt", b"replaced".as_slice());

        let keys = store.list_all_keys().await.unwrap();
        assert_eq!(keys, vec![ObjectKey::from("a.txt"), ObjectKey::from("b/c.txt")]);
    }
}
