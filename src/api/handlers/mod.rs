//! HTTP endpoint handlers organized by resource.

pub mod booking;
pub mod hotel;
pub mod system;

use axum::Router;
use axum::extract::Path;
use axum::extract::rejection::PathRejection;
use axum::http::Uri;

use crate::app_state::AppState;
use crate::error::BookingError;

/// Where successful and failed booking writes alike redirect to.
pub const BOOKINGS_PAGE: &str = "/bookings";

/// Unwraps an integer path segment.
///
/// A segment that is not an `i64` (`/hotel/abc`, or a value out of range)
/// names no resource, so it is reported as an unmatched route.
fn path_id(path: Result<Path<i64>, PathRejection>, uri: &Uri) -> Result<i64, BookingError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(path = uri.path(), reason = %rejection.body_text(), "non-integer id");
        BookingError::RouteNotFound(uri.path().to_string())
    })
}

/// Composes all resource routes that go through request accounting.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(hotel::routes())
        .merge(booking::routes())
        .merge(system::routes())
}
