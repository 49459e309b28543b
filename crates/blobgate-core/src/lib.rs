//! blobgate-core - Core traits and types for blobgate storage backends
//!
//! This crate provides the fundamental abstractions that allow different
//! storage backends (Azure Blob, in-memory, etc.) to serve the blobgate API.

pub mod error;
pub mod memory;
pub mod name;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use name::blob_name_from_uri;
pub use store::BlobStore;
