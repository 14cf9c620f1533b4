//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::metrics::BookingMetrics;
use crate::service::BookingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking service for all business logic.
    pub booking_service: Arc<BookingService>,
    /// Metrics registry, also written by the request-accounting middleware.
    pub metrics: Arc<BookingMetrics>,
}

impl AppState {
    /// Builds the state from a service, sharing the service's metrics.
    #[must_use]
    pub fn new(booking_service: BookingService) -> Self {
        let metrics = Arc::clone(booking_service.metrics());
        Self {
            booking_service: Arc::new(booking_service),
            metrics,
        }
    }
}
