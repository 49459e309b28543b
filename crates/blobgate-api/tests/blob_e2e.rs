//! E2E tests for the upload/delete endpoints
//!
//! Runs the full router against an in-process server on an ephemeral port,
//! backed by a MemoryStore so storage side effects can be asserted directly.

use std::net::SocketAddr;
use std::sync::Arc;

use blobgate_api::{create_router, AppState};
use blobgate_core::{BlobStore, MemoryStore};
use bytes::Bytes;
use tokio::net::TcpListener;

// =============================================================================
// Test Helpers
// =============================================================================

struct TestServer {
    addr: SocketAddr,
    store: Arc<MemoryStore>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone() as Arc<dyn BlobStore>, "products");
        let router = create_router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        Self {
            addr,
            store,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn upload(&self, name: &str, body: &'static [u8]) -> reqwest::Response {
        self.client
            .post(self.url("/upload"))
            .header("file-name", name)
            .body(body)
            .send()
            .await
            .unwrap()
    }

    async fn delete(&self, blob_uri: &str) -> reqwest::Response {
        self.client
            .delete(self.url("/delete"))
            .query(&[("blobUri", blob_uri)])
            .send()
            .await
            .unwrap()
    }
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn upload_stores_blob_and_confirms() {
    let server = TestServer::start().await;

    let resp = server.upload("a.txt", b"hello").await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "Blob 'a.txt' uploaded successfully.");
    let stored = server.store.fetch_blob("a.txt").await.unwrap();
    assert_eq!(&stored[..], b"hello");
}

#[tokio::test]
async fn upload_without_file_name_header_is_500_and_writes_nothing() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .post(server.url("/upload"))
        .body("hello")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "Failed to upload blob.");
    assert!(server.store.is_empty());
}

#[tokio::test]
async fn upload_with_empty_file_name_is_500() {
    let server = TestServer::start().await;

    let resp = server.upload("", b"hello").await;

    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "Failed to upload blob.");
    assert!(server.store.is_empty());
}

#[tokio::test]
async fn reupload_overwrites_prior_content() {
    let server = TestServer::start().await;

    assert_eq!(server.upload("a.txt", b"old").await.status(), 200);
    assert_eq!(server.upload("a.txt", b"new").await.status(), 200);

    let stored = server.store.fetch_blob("a.txt").await.unwrap();
    assert_eq!(&stored[..], b"new");
    assert_eq!(server.store.len(), 1);
}

#[tokio::test]
async fn upload_accepts_empty_body() {
    let server = TestServer::start().await;

    let resp = server.upload("empty.bin", b"").await;

    assert_eq!(resp.status(), 200);
    assert_eq!(
        server.store.fetch_blob("empty.bin").await.unwrap(),
        Bytes::new()
    );
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn delete_removes_uploaded_blob() {
    let server = TestServer::start().await;
    server.upload("a.txt", b"hello").await;

    let resp = server
        .delete("https://acct.blob.core.windows.net/products/a.txt")
        .await;

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "Blob 'a.txt' deleted successfully.");
    assert!(!server.store.blob_exists("a.txt").await.unwrap());
}

#[tokio::test]
async fn delete_of_missing_blob_is_idempotent() {
    let server = TestServer::start().await;

    let resp = server
        .delete("https://acct.blob.core.windows.net/products/never-uploaded.txt")
        .await;

    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.text().await.unwrap(),
        "Blob 'never-uploaded.txt' deleted successfully."
    );
}

#[tokio::test]
async fn delete_without_blob_uri_is_500() {
    let server = TestServer::start().await;
    server.upload("a.txt", b"hello").await;

    let resp = server
        .client
        .delete(server.url("/delete"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "Failed to delete blob.");
    // Storage untouched.
    assert!(server.store.blob_exists("a.txt").await.unwrap());
}

#[tokio::test]
async fn delete_with_relative_uri_is_500() {
    let server = TestServer::start().await;

    let resp = server.delete("products/a.txt").await;

    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "Failed to delete blob.");
}

#[tokio::test]
async fn delete_with_empty_blob_uri_is_500() {
    let server = TestServer::start().await;

    let resp = server.delete("").await;

    assert_eq!(resp.status(), 500);
    assert_eq!(resp.text().await.unwrap(), "Failed to delete blob.");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_check_responds_ok() {
    let server = TestServer::start().await;

    let resp = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}
