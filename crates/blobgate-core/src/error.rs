//! Common error types for storage backends

use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in storage backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Blob name is empty or otherwise unusable
    #[error("Invalid blob name: {0}")]
    InvalidName(String),

    /// Blob not found
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Credentials missing or rejected by the storage service
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport/communication error reaching the storage service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Storage service returned an error status
    #[error("Storage service error (HTTP {status}): {message}")]
    Service { status: u16, message: String },

    /// Backend configuration error (connection string, endpoint)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns the HTTP status code this error would map to if surfaced
    /// directly. The API boundary collapses everything to 500; this is
    /// kept for logging context.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::InvalidName(_) => 400,
            StoreError::NotFound(_) => 404,
            StoreError::Auth(_) => 403,
            StoreError::Transport(_) => 503,
            StoreError::Service { status, .. } => *status,
            StoreError::Config(_) => 500,
        }
    }
}
