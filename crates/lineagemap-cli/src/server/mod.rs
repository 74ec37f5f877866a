//! HTTP server module for serve mode.
//!
//! This module provides a local HTTP server that serves the embedded web UI
//! and exposes a REST API for lineage analysis.

pub mod api;
mod assets;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use lineagemap_core::LineageAnalyzer;
use tower_http::cors::CorsLayer;

pub use state::{AppState, LatestResult, ServerConfig};

/// Largest accepted request body; pasted code beyond this is rejected.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Run the HTTP server with embedded web UI.
///
/// This function blocks until the server is shut down (e.g., via Ctrl+C).
pub async fn run_server(config: ServerConfig, analyzer: LineageAnalyzer) -> Result<()> {
    let port = config.port;
    let open_browser = config.open_browser;
    let state = Arc::new(AppState::new(config, analyzer));

    let app = build_router(state, port);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    // Bind first so the browser never opens on a dead port
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    println!("lineagemap: server listening on http://{addr}");

    if open_browser {
        let url = format!("http://localhost:{port}");
        if let Err(e) = open::that(&url) {
            eprintln!("lineagemap: warning: failed to open browser: {e}");
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    println!("\nlineagemap: server stopped");

    Ok(())
}

/// Build the main router with all routes.
pub fn build_router(state: Arc<AppState>, port: u16) -> Router {
    // Only the page served by this process may call the API.
    let allowed_origins: Vec<HeaderValue> = [
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
    ]
    .into_iter()
    .filter_map(|origin| origin.parse().ok())
    .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .nest("/api", api::api_routes())
        .fallback(assets::static_handler)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        eprintln!("lineagemap: warning: failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
