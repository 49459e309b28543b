//! Application state for the blobgate API

use std::sync::Arc;

use blobgate_core::BlobStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Storage backend, constructed once at startup
    store: Arc<dyn BlobStore>,
    /// Container name, kept for log context
    container: String,
}

impl AppState {
    /// Create a new AppState with the given store
    pub fn new(store: Arc<dyn BlobStore>, container: impl Into<String>) -> Self {
        Self {
            store,
            container: container.into(),
        }
    }

    /// Get the storage backend
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Get the container name
    pub fn container(&self) -> &str {
        &self.container
    }
}
