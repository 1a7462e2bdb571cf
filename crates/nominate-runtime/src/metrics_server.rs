//! Prometheus scrape endpoint.

use std::net::SocketAddr;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use nc_telemetry::encode_metrics;
use tracing::{error, info};

/// Router exposing `GET /metrics`.
pub fn router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serve the router on `addr` until the process exits.
pub async fn serve_metrics(addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "[runtime] Metrics endpoint listening");
    axum::serve(listener, router()).await
}

async fn metrics_handler() -> Response {
    match encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "[runtime] Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
