//! HTTP surface for adfi.
//!
//! This crate provides a native Rust HTTP server using axum, serving:
//! - Webhook endpoints for Jira lifecycle events (attachment/issue
//!   created/deleted/updated)
//! - A settings and export API backing the configuration surface
//!
//! # Quick Start
//!
//! ```ignore
//! use adfi_config::Config;
//! use adfi_server::run_server;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load(None, None).unwrap();
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Jira ──webhook──► axum server (adfi-server)
//!                       │
//!                       ├─► /events/* (never error outward)
//!                       │       │
//!                       │       └─► spawn_blocking ──► ImportService /
//!                       │                              CleanupService
//!                       │
//!                       └─► /api/* (settings, export; errors become
//!                                   HTTP statuses)
//! ```
//!
//! Webhook handlers honor the event-pipeline boundary: malformed payloads
//! and downstream failures are logged and answered `204 No Content`, never
//! surfaced as errors to the sender.

mod app;
mod error;
mod handlers;
mod state;

use std::sync::Arc;

use tracing::info;

use adfi_config::Config;

use crate::state::AppState;

/// Error preventing the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    /// Invalid or incomplete configuration.
    #[error("configuration error: {0}")]
    Config(#[from] adfi_config::ConfigError),

    /// The key-value store could not be opened.
    #[error("storage error: {0}")]
    Storage(#[from] adfi_storage::KvsError),

    /// Listener or serve failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the application state from config and serve until shutdown.
///
/// # Errors
///
/// Returns [`ServeError`] when the config is incomplete, the store cannot
/// be opened, or the listener cannot bind.
pub async fn run_server(config: Config) -> Result<(), ServeError> {
    let state = Arc::new(AppState::from_config(&config)?);
    let router = app::create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {addr}");

    axum::serve(listener, router).await?;
    Ok(())
}
