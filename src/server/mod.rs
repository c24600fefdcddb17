//! HTTP surface over the query layer.
//!
//! - `GET /latest?country=&maturity=[&date=]`
//! - `GET /timeseries?country=&maturity=&start=&end=`
//! - `GET /health`

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{AppError, EXIT_INTERNAL, EXIT_USAGE};
use crate::query::QueryEngine;

/// Build the router around a shared engine.
pub fn router(engine: Arc<QueryEngine>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/latest", get(handlers::latest))
        .route("/timeseries", get(handlers::timeseries))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

/// Bind `host:port` and serve until the process is stopped.
pub async fn serve(engine: Arc<QueryEngine>, host: &str, port: u16) -> Result<(), AppError> {
    let listener = TcpListener::bind((host, port))
        .await
        .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to bind {host}:{port}: {e}")))?;
    let addr = listener
        .local_addr()
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Failed to read bound address: {e}")))?;
    info!("Serving yield curves on http://{addr}");

    axum::serve(listener, router(engine))
        .await
        .map_err(|e| AppError::new(EXIT_INTERNAL, format!("Server error: {e}")))
}
