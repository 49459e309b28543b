//! Blob name derivation from caller-supplied URIs

use url::Url;

use crate::error::{StoreError, StoreResult};

/// Extract the blob name from an absolute blob URI.
///
/// The name is the final path segment of the URI, e.g.
/// `https://acct.blob.core.windows.net/products/a.txt` -> `a.txt`.
/// The segment is used as received, without percent-decoding, and no
/// check is made that it resolves to an existing blob.
pub fn blob_name_from_uri(blob_uri: &str) -> StoreResult<String> {
    let url = Url::parse(blob_uri)
        .map_err(|e| StoreError::InvalidName(format!("not an absolute URI '{}': {}", blob_uri, e)))?;

    let name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| {
            StoreError::InvalidName(format!("no blob name in URI path: {}", blob_uri))
        })?;

    Ok(name.to_string())
}
