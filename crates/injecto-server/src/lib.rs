//! HTTP API for Injecto.
//!
//! This crate exposes directive processing over HTTP using axum:
//! - `GET /health` for liveness checks
//! - `POST /process` to process a directory of a git repository and get a
//!   JSON summary
//! - `POST /process-git-download` for the same, returning a zip archive
//! - `POST /process-upload` to process uploaded files (multipart) and get
//!   a zip archive
//!
//! # Quick Start
//!
//! ```ignore
//! use injecto_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_owned(),
//!         port: 8000,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Client ──HTTP──► axum router (injecto-server)
//!                        │
//!                        ├─► request validation (handlers)
//!                        │
//!                        └─► spawn_blocking job
//!                                │
//!                                ├─► Workspace (temp dir, removed on drop)
//!                                ├─► git clone / uploaded files
//!                                ├─► injecto_fs::process_files
//!                                └─► zip archive of the output tree
//! ```

mod app;
mod archive;
mod error;
mod handlers;
mod job;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use state::AppState;

pub use error::ServerError;

/// Default request body limit for uploads (64 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
    /// Application version reported by `/health`.
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8000,
            body_limit: DEFAULT_BODY_LIMIT,
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        version: config.version.clone(),
    });
    let app = app::create_router(state, config.body_limit);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting Injecto API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from Injecto config.
///
/// # Arguments
///
/// * `config` - Injecto configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &injecto_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        body_limit: DEFAULT_BODY_LIMIT,
        version,
    }
}
