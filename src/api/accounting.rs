//! Per-request accounting middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::metrics::BookingMetrics;

/// Route label used when no route matched the request.
const UNMATCHED_ROUTE: &str = "unmatched";

/// Counts every request by raw path and observes its latency.
pub async fn track_requests(
    State(metrics): State<Arc<BookingMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().as_str().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| UNMATCHED_ROUTE.to_string(), |p| p.as_str().to_string());

    let start = Instant::now();
    let response = next.run(request).await;

    metrics.record_request(
        &path,
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}
