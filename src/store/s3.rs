//! S3-backed remote store

use std::collections::BTreeSet;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;

use super::RemoteStore;
use crate::error::{Result, SyncError};
use crate::types::ObjectKey;

/// Remote store backed by an S3 bucket.
///
/// One client handle is shared across both sync paths; every call is
/// stateless.
pub struct S3Store {
    client: S3Client,
    bucket: String,
}

impl S3Store {
    /// Connect using ambient AWS configuration (environment, profile,
    /// instance role), optionally overriding the region.
    pub async fn connect(bucket: impl Into<String>, region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region));
        }
        let config = loader.load().await;

        Self {
            client: S3Client::new(&config),
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl RemoteStore for S3Store {
    async fn put(&self, key: &ObjectKey, bytes: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| SyncError::Transfer(e.to_string()))?;

        Ok(())
    }

    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| SyncError::Transfer(e.to_string()))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| SyncError::Transfer(e.to_string()))?
            .into_bytes();

        Ok(data.to_vec())
    }

    async fn delete(&self, key: &ObjectKey) -> Result<()> {
        // S3 reports success for absent keys, which matches the contract
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
            .map_err(|e| SyncError::Transfer(e.to_string()))?;

        Ok(())
    }

    async fn list_all_keys(&self) -> Result<Vec<ObjectKey>> {
        let mut keys = BTreeSet::new();

        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| SyncError::Transfer(e.to_string()))?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    keys.insert(ObjectKey::new(key));
                }
            }
        }

        Ok(keys.into_iter().collect())
    }
}
