//! Blob upload and delete handlers
//!
//! Both endpoints are single-shot proxies to the storage backend: extract a
//! blob name from the request, make one storage call, report the outcome as
//! plain text.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::HeaderMap;

use blobgate_core::blob_name_from_uri;

use crate::error::{ApiError, BlobOp};
use crate::state::AppState;

/// POST /upload
///
/// Streams the request body to the blob named by the `file-name` header,
/// overwriting any existing blob of that name.
pub async fn upload_blob(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<String, ApiError> {
    let name = headers
        .get("file-name")
        .ok_or_else(|| {
            ApiError::validation(BlobOp::Upload, "file-name header is missing from the request")
        })?
        .to_str()
        .map_err(|_| ApiError::validation(BlobOp::Upload, "file-name header is not valid text"))?;

    if name.is_empty() {
        return Err(ApiError::validation(BlobOp::Upload, "file-name header is empty"));
    }

    let size = body.len();
    state
        .store()
        .put_blob(name, body)
        .await
        .map_err(|e| ApiError::store(BlobOp::Upload, e))?;

    tracing::info!(
        blob = %name,
        size,
        container = %state.container(),
        "Blob uploaded"
    );

    Ok(format!("Blob '{}' uploaded successfully.", name))
}

/// DELETE /delete?blobUri=<absolute URI>
///
/// Deletes the blob named by the final path segment of `blobUri`, together
/// with its snapshots. Deleting a blob that does not exist still succeeds.
pub async fn delete_blob(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<String, ApiError> {
    let blob_uri = params
        .get("blobUri")
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| {
            ApiError::validation(BlobOp::Delete, "blobUri is missing from the query string")
        })?;

    let name = blob_name_from_uri(blob_uri)
        .map_err(|e| ApiError::validation(BlobOp::Delete, e.to_string()))?;

    state
        .store()
        .delete_blob(&name)
        .await
        .map_err(|e| ApiError::store(BlobOp::Delete, e))?;

    tracing::info!(
        blob = %name,
        container = %state.container(),
        "Blob deleted"
    );

    Ok(format!("Blob '{}' deleted successfully.", name))
}
