//! blobgated - blobgate daemon
//!
//! HTTP gateway exposing blob upload and delete against an Azure Blob
//! Storage container.
//!
//! Usage:
//!   blobgated [OPTIONS]
//!
//! The storage connection string is read from the
//! AZURE_STORAGE_CONNECTION_STRING environment variable, falling back to
//! AzureWebJobsStorage.

use std::net::SocketAddr;
use std::sync::Arc;

use blobgate_api::{create_router, AppState};
use blobgate_azure::AzureBlobStore;
use blobgate_core::{BlobStore, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default container name holding all blobs.
const DEFAULT_CONTAINER: &str = "products";

/// Parsed command-line arguments
struct Args {
    /// Listen port
    port: u16,
    /// Storage container name
    container: String,
    /// Use the in-memory store instead of Azure (no credentials needed)
    memory: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut port = 8080u16;
    let mut container = String::from(DEFAULT_CONTAINER);
    let mut memory = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse()?;
                    i += 2;
                } else {
                    anyhow::bail!("Missing argument for --port");
                }
            }
            "--container" | "-c" => {
                if i + 1 < args.len() {
                    container = args[i + 1].clone();
                    i += 2;
                } else {
                    anyhow::bail!("Missing argument for --container");
                }
            }
            "--memory" => {
                memory = true;
                i += 1;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                tracing::warn!("Unknown argument: {}", args[i]);
                i += 1;
            }
        }
    }

    Ok(Args {
        port,
        container,
        memory,
    })
}

fn print_help() {
    eprintln!(
        r#"blobgated - blobgate daemon

Usage: blobgated [OPTIONS]

Options:
  -p, --port <PORT>            Listen port (default: 8080)
  -c, --container <NAME>       Storage container name (default: products)
      --memory                 Use an in-memory store instead of Azure
  -h, --help                   Print this help message

Environment:
  AZURE_STORAGE_CONNECTION_STRING   Storage connection string
  AzureWebJobsStorage               Fallback connection string variable

Examples:
  # Serve the products container of the configured storage account
  AZURE_STORAGE_CONNECTION_STRING='DefaultEndpointsProtocol=https;AccountName=...' blobgated

  # Local development without credentials
  blobgated --memory --port 9090
"#
    );
}

/// Read the storage connection string from the environment.
fn connection_string() -> anyhow::Result<String> {
    std::env::var("AZURE_STORAGE_CONNECTION_STRING")
        .or_else(|_| std::env::var("AzureWebJobsStorage"))
        .map_err(|_| {
            anyhow::anyhow!(
                "No storage connection string found. Set \
                 AZURE_STORAGE_CONNECTION_STRING (or AzureWebJobsStorage), \
                 or run with --memory."
            )
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blobgated=info,blobgate_api=info,blobgate_azure=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;

    tracing::info!(
        port = args.port,
        container = %args.container,
        memory = args.memory,
        "Starting blobgated"
    );

    // Construct the store once; it is shared read-only across requests.
    let store: Arc<dyn BlobStore> = if args.memory {
        Arc::new(MemoryStore::new())
    } else {
        let conn = connection_string()?;
        Arc::new(
            AzureBlobStore::from_connection_string(&conn, args.container.clone())
                .map_err(|e| anyhow::anyhow!("Failed to create Azure store: {}", e))?,
        )
    };

    let state = AppState::new(store, args.container);
    let app = create_router(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Listening on http://{}", addr);

    // Run the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
