//! HTTP layer: route handlers, DTOs, request accounting, router composition.

pub mod accounting;
pub mod doc;
pub mod dto;
pub mod handlers;

use std::sync::Arc;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the complete application router.
///
/// Every route except `/metrics` (and the Swagger UI, when enabled) is
/// counted in `requests_by_path`, including requests that match no route.
pub fn build_router(state: AppState) -> Router {
    let counted = handlers::routes()
        .fallback(handlers::system::not_found_handler)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.metrics),
            accounting::track_requests,
        ));

    let router = counted.merge(handlers::system::metrics_routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(doc::swagger_ui());

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds a router that serves only `/metrics`, for a dedicated listener.
pub fn build_metrics_router(state: AppState) -> Router {
    handlers::system::metrics_routes()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
