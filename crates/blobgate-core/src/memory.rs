//! In-memory BlobStore for local development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::BlobStore;

/// A BlobStore backed by a process-local map.
///
/// Used as the `--memory` backend of the daemon and as the storage
/// collaborator in API integration tests. Snapshots do not exist in this
/// backend, so delete simply removes the entry.
#[derive(Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.read().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put_blob(&self, name: &str, data: Bytes) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidName("empty blob name".to_string()));
        }
        self.blobs.write().insert(name.to_string(), data);
        Ok(())
    }

    async fn delete_blob(&self, name: &str) -> StoreResult<()> {
        // Idempotent: removing an absent blob is a no-op.
        self.blobs.write().remove(name);
        Ok(())
    }

    async fn fetch_blob(&self, name: &str) -> StoreResult<Bytes> {
        self.blobs
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    async fn blob_exists(&self, name: &str) -> StoreResult<bool> {
        Ok(self.blobs.read().contains_key(name))
    }
}
