//! HTTP surface for the relay engine.
//!
//! Routes, wire types, request-rate admission, and the serve loop. The
//! handlers stay thin: every decision with a tradeoff lives in
//! [`crate::relay`]; this module only maps query parameters in and
//! statuses, headers, and byte streams out.

mod handlers;
pub mod rate_limit;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::config::ServerConfig;

pub use handlers::AppState;

/// Errors from the serve loop.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listen address.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that failed to bind.
        addr: SocketAddr,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The accept loop failed.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Builds the application router.
///
/// Rate-limit admission wraps all routes, the health probe included.
/// CORS is permissive: the proxy is its own public surface.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/probe", get(handlers::probe))
        .route("/download", get(handlers::download))
        .route("/health", get(handlers::health))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit::admit,
        ))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the configured address and serves until ctrl-c.
///
/// # Errors
///
/// Returns `ServerError::Bind` when the address cannot be bound and
/// `ServerError::Serve` when the accept loop fails.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let addr = SocketAddr::new(config.host, config.port);
    let state = Arc::new(AppState::new(&config));
    let app = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(address = %addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown signal received");
}
