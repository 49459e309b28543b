//! blobgate-azure - Azure Blob Storage backend for blobgate
//!
//! Implements [`BlobStore`] against the Azure Blob REST API using `reqwest`
//! with Shared Key request signing. All blobs live in a single container
//! which is created on first use if missing.

pub mod connection;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use bytes::Bytes;
use hmac::{Hmac, Mac};
use reqwest::StatusCode;
use sha2::Sha256;
use tracing::{debug, info};

use blobgate_core::{BlobStore, StoreError, StoreResult};

pub use connection::ConnectionString;

/// Azure Blob REST API version sent with every request.
const AZURE_API_VERSION: &str = "2023-11-03";

/// Per-request timeout for storage calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Percent-encoding set for blob names in URL paths: encode everything
/// except unreserved characters and '/'.
const BLOB_ENCODE_SET: percent_encoding::AsciiSet = percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// A [`BlobStore`] backed by an Azure Blob Storage container.
pub struct AzureBlobStore {
    client: reqwest::Client,
    /// Storage account name, used in the Shared Key signature.
    account: String,
    /// Decoded account key for HMAC-SHA256 signing.
    key_bytes: Vec<u8>,
    /// Blob service endpoint, no trailing slash.
    endpoint: String,
    /// Container holding all blobs managed by this store.
    container: String,
    /// Set once the container is known to exist; later writes skip the
    /// create-if-missing round trip.
    container_ready: AtomicBool,
}

impl AzureBlobStore {
    /// Create a store from a parsed connection string.
    pub fn new(conn: ConnectionString, container: impl Into<String>) -> StoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to create HTTP client: {}", e)))?;

        let container = container.into();
        info!(
            account = %conn.account,
            endpoint = %conn.blob_endpoint,
            container = %container,
            "Azure blob store initialized"
        );

        Ok(Self {
            client,
            account: conn.account,
            key_bytes: conn.key_bytes,
            endpoint: conn.blob_endpoint,
            container,
            container_ready: AtomicBool::new(false),
        })
    }

    /// Create a store from a raw connection string.
    pub fn from_connection_string(
        raw: &str,
        container: impl Into<String>,
    ) -> StoreResult<Self> {
        Self::new(ConnectionString::parse(raw)?, container)
    }

    /// Full URL for a blob, with the name percent-encoded.
    fn blob_url(&self, blob_name: &str) -> String {
        let encoded =
            percent_encoding::utf8_percent_encode(blob_name, &BLOB_ENCODE_SET).to_string();
        format!("{}/{}/{}", self.endpoint, self.container, encoded)
    }

    /// Current UTC date in RFC 1123 format for the `x-ms-date` header.
    fn rfc1123_date() -> String {
        httpdate::fmt_http_date(std::time::SystemTime::now())
    }

    /// Build the Shared Key string-to-sign for a request.
    ///
    /// `resource_path` is the un-encoded path below the account
    /// (e.g. `products/a.txt`); Azure signs the raw name, not the
    /// percent-encoded URL form.
    fn string_to_sign(
        &self,
        method: &str,
        resource_path: &str,
        content_length: Option<usize>,
        content_type: &str,
        date: &str,
        extra_headers: &[(&str, &str)],
        query_params: &[(&str, &str)],
    ) -> String {
        // Content-Length is signed as empty for 0 or body-less requests.
        let content_length_str = match content_length {
            Some(0) | None => String::new(),
            Some(len) => len.to_string(),
        };

        // Canonicalized x-ms-* headers, lowercase and sorted.
        let mut ms_headers: Vec<(String, String)> = vec![
            ("x-ms-date".to_string(), date.to_string()),
            ("x-ms-version".to_string(), AZURE_API_VERSION.to_string()),
        ];
        for (k, v) in extra_headers {
            let lk = k.to_lowercase();
            if lk.starts_with("x-ms-") && lk != "x-ms-date" && lk != "x-ms-version" {
                ms_headers.push((lk, v.to_string()));
            }
        }
        ms_headers.sort_by(|a, b| a.0.cmp(&b.0));
        let canonicalized_headers: String = ms_headers
            .iter()
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join("\n");

        // Canonicalized resource: /{account}/{path}, then query parameters
        // sorted by key.
        let mut canonicalized_resource = format!("/{}/{}", self.account, resource_path);
        if !query_params.is_empty() {
            let mut sorted = query_params.to_vec();
            sorted.sort_by(|a, b| a.0.cmp(b.0));
            for (k, v) in &sorted {
                canonicalized_resource.push_str(&format!("\n{}:{}", k.to_lowercase(), v));
            }
        }

        // Fields: VERB, Content-Encoding, Content-Language, Content-Length,
        // Content-MD5, Content-Type, Date, If-Modified-Since, If-Match,
        // If-None-Match, If-Unmodified-Since, Range, then canonicalized
        // headers and resource.
        format!(
            "{}\n\n\n{}\n\n{}\n\n\n\n\n\n\n{}\n{}",
            method, content_length_str, content_type, canonicalized_headers,
            canonicalized_resource
        )
    }

    /// Sign a request and return the `Authorization` header value.
    fn authorization(
        &self,
        method: &str,
        resource_path: &str,
        content_length: Option<usize>,
        content_type: &str,
        date: &str,
        extra_headers: &[(&str, &str)],
        query_params: &[(&str, &str)],
    ) -> StoreResult<String> {
        let string_to_sign = self.string_to_sign(
            method,
            resource_path,
            content_length,
            content_type,
            date,
            extra_headers,
            query_params,
        );

        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(&self.key_bytes)
            .map_err(|e| StoreError::Config(format!("HMAC key error: {}", e)))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64_STANDARD.encode(mac.finalize().into_bytes());

        Ok(format!("SharedKey {}:{}", self.account, signature))
    }

    fn transport_error(context: &str, err: reqwest::Error) -> StoreError {
        StoreError::Transport(format!("Azure {} request failed: {}", context, err))
    }

    fn service_error(context: &str, status: StatusCode, body: &str) -> StoreError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                StoreError::Auth(format!("Azure {} rejected: HTTP {}", context, status))
            }
            _ => StoreError::Service {
                status: status.as_u16(),
                message: format!("Azure {}: {}", context, body),
            },
        }
    }

    /// Create the container if it does not exist. 409 means it already
    /// does, which is fine. The result is cached so only the first write
    /// pays for the extra round trip.
    async fn ensure_container(&self) -> StoreResult<()> {
        if self.container_ready.load(Ordering::Relaxed) {
            return Ok(());
        }

        let url = format!("{}/{}?restype=container", self.endpoint, self.container);
        let date = Self::rfc1123_date();
        let auth = self.authorization(
            "PUT",
            &self.container,
            None,
            "",
            &date,
            &[],
            &[("restype", "container")],
        )?;

        let resp = self
            .client
            .put(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| Self::transport_error("create container", e))?;

        let status = resp.status();
        if status.is_success() {
            debug!(container = %self.container, "Container created");
        } else if status == StatusCode::CONFLICT {
            // ContainerAlreadyExists
        } else {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::service_error("create container", status, &body));
        }

        self.container_ready.store(true, Ordering::Relaxed);
        Ok(())
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    /// Put Blob: uploads as a block blob, replacing any existing blob of
    /// the same name.
    async fn put_blob(&self, name: &str, data: Bytes) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidName("empty blob name".to_string()));
        }
        self.ensure_container().await?;

        let url = self.blob_url(name);
        let date = Self::rfc1123_date();
        let content_type = "application/octet-stream";
        let resource_path = format!("{}/{}", self.container, name);
        let auth = self.authorization(
            "PUT",
            &resource_path,
            Some(data.len()),
            content_type,
            &date,
            &[("x-ms-blob-type", "BlockBlob")],
            &[],
        )?;

        let resp = self
            .client
            .put(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", content_type)
            .header("Authorization", auth)
            .body(data)
            .send()
            .await
            .map_err(|e| Self::transport_error("upload", e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::service_error("upload", status, &body));
        }

        debug!(blob = %name, "Blob uploaded");
        Ok(())
    }

    /// Delete Blob including snapshots. Idempotent: a 404 (missing blob or
    /// missing container) is treated as success.
    async fn delete_blob(&self, name: &str) -> StoreResult<()> {
        if name.is_empty() {
            return Err(StoreError::InvalidName("empty blob name".to_string()));
        }

        let url = self.blob_url(name);
        let date = Self::rfc1123_date();
        let resource_path = format!("{}/{}", self.container, name);
        let auth = self.authorization(
            "DELETE",
            &resource_path,
            None,
            "",
            &date,
            &[("x-ms-delete-snapshots", "include")],
            &[],
        )?;

        let resp = self
            .client
            .delete(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION)
            .header("x-ms-delete-snapshots", "include")
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| Self::transport_error("delete", e))?;

        let status = resp.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::service_error("delete", status, &body));
        }

        debug!(blob = %name, "Blob deleted");
        Ok(())
    }

    async fn fetch_blob(&self, name: &str) -> StoreResult<Bytes> {
        let url = self.blob_url(name);
        let date = Self::rfc1123_date();
        let resource_path = format!("{}/{}", self.container, name);
        let auth =
            self.authorization("GET", &resource_path, None, "", &date, &[], &[])?;

        let resp = self
            .client
            .get(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| Self::transport_error("download", e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Self::service_error("download", status, &body));
        }

        resp.bytes()
            .await
            .map_err(|e| Self::transport_error("download body", e))
    }

    async fn blob_exists(&self, name: &str) -> StoreResult<bool> {
        let url = self.blob_url(name);
        let date = Self::rfc1123_date();
        let resource_path = format!("{}/{}", self.container, name);
        let auth =
            self.authorization("HEAD", &resource_path, None, "", &date, &[], &[])?;

        let resp = self
            .client
            .head(&url)
            .header("x-ms-date", &date)
            .header("x-ms-version", AZURE_API_VERSION)
            .header("Authorization", auth)
            .send()
            .await
            .map_err(|e| Self::transport_error("exists", e))?;

        let status = resp.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(Self::service_error("exists", status, ""))
        }
    }
}
