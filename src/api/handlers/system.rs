//! System endpoints: health check, metrics scrape, unmatched routes.

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::error::BookingError;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health`: Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /metrics`: Prometheus text exposition.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "System",
    summary = "Prometheus metrics",
    description = "Commit, booking and request counters in the Prometheus text format. Scrapes are not counted in `requests_by_path`.",
    responses(
        (status = 200, description = "Metrics scrape", content_type = "text/plain", body = String),
    )
)]
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
        state.metrics.render(),
    )
}

/// Fallback for paths no route matches.
pub async fn not_found_handler(uri: Uri) -> BookingError {
    BookingError::RouteNotFound(uri.path().to_string())
}

/// System routes that go through request accounting.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}

/// The scrape route, kept outside request accounting.
pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}
