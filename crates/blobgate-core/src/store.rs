//! BlobStore trait - the core abstraction for blobgate storage backends

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;

/// A storage backend holding named blobs in a single container.
///
/// Implementations must be safe to share across request handlers
/// (`Send + Sync`); the service constructs one store at startup and
/// shares it read-only behind an `Arc`.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write `data` to the blob named `name`, replacing any existing
    /// blob of the same name.
    async fn put_blob(&self, name: &str, data: Bytes) -> StoreResult<()>;

    /// Delete the blob named `name` together with its snapshots.
    ///
    /// Deleting a blob that does not exist is not an error.
    async fn delete_blob(&self, name: &str) -> StoreResult<()>;

    /// Read back the full contents of the blob named `name`.
    async fn fetch_blob(&self, name: &str) -> StoreResult<Bytes>;

    /// Check whether the blob named `name` exists.
    async fn blob_exists(&self, name: &str) -> StoreResult<bool>;
}
