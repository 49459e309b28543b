//! blobgate-api - HTTP API layer for blob upload/delete
//!
//! This crate provides the HTTP layer that uses the [`BlobStore`] trait to
//! serve the upload and delete endpoints. It is backend-agnostic.
//!
//! # Usage
//!
//! ```ignore
//! use blobgate_api::{create_router, AppState};
//! use blobgate_azure::AzureBlobStore;
//!
//! let store = AzureBlobStore::from_connection_string(&conn, "products")?;
//! let state = AppState::new(Arc::new(store), "products");
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the blobgate router with the given application state
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Blob routes
        .route("/upload", post(handlers::blobs::upload_blob))
        .route("/delete", delete(handlers::blobs::delete_blob))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
