//! API error types and conversions
//!
//! Every failure crossing the HTTP boundary collapses to a 500 with a
//! generic per-operation text body; the underlying cause is logged, never
//! sent to the caller. This matches the service's original contract, which
//! reports validation failures and storage failures identically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use blobgate_core::StoreError;

/// The operation a failed request was performing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobOp {
    Upload,
    Delete,
}

impl BlobOp {
    /// Generic failure body returned to the caller.
    fn failure_message(self) -> &'static str {
        match self {
            BlobOp::Upload => "Failed to upload blob.",
            BlobOp::Delete => "Failed to delete blob.",
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            BlobOp::Upload => "upload",
            BlobOp::Delete => "delete",
        }
    }
}

/// API error type that converts to HTTP responses
#[derive(Debug)]
pub struct ApiError {
    op: BlobOp,
    kind: ErrorKind,
}

#[derive(Debug)]
enum ErrorKind {
    /// Request failed validation before reaching storage
    Validation(String),
    /// Storage call failed
    Store(StoreError),
}

impl ApiError {
    pub fn validation(op: BlobOp, reason: impl Into<String>) -> Self {
        Self {
            op,
            kind: ErrorKind::Validation(reason.into()),
        }
    }

    pub fn store(op: BlobOp, source: StoreError) -> Self {
        Self {
            op,
            kind: ErrorKind::Store(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self.kind {
            ErrorKind::Validation(reason) => {
                tracing::error!(op = self.op.as_str(), %reason, "Request validation failed");
            }
            ErrorKind::Store(source) => {
                tracing::error!(
                    op = self.op.as_str(),
                    cause_status = source.status_code(),
                    error = %source,
                    "Storage operation failed"
                );
            }
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            self.op.failure_message(),
        )
            .into_response()
    }
}
