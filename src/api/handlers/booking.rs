//! Booking handlers: list and cancel.

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};

use super::{BOOKINGS_PAGE, path_id};
use crate::api::dto::BookingListResponse;
use crate::app_state::AppState;
use crate::domain::BookingId;
use crate::error::{BookingError, ErrorResponse};

/// `GET /bookings`: List every booking.
///
/// Also refreshes the `total_bookings` gauge.
///
/// # Errors
///
/// Returns [`BookingError::PersistenceError`] if the bookings cannot be read.
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "Bookings",
    summary = "List bookings",
    description = "Returns every booking with its room and hotel.",
    responses(
        (status = 200, description = "Booking list", body = BookingListResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, BookingError> {
    let bookings = state.booking_service.list_bookings().await?;
    Ok(Json(BookingListResponse::from(bookings)))
}

/// `POST /cancel/{booking_id}`: Cancel a booking, then redirect to the list.
///
/// A cancellation that fails to commit is rolled back and counted, and the
/// client is redirected exactly as on success.
///
/// # Errors
///
/// Returns [`BookingError::BookingNotFound`] if the booking does not exist, or
/// [`BookingError::RouteNotFound`] if `booking_id` is not an integer.
#[utoipa::path(
    post,
    path = "/cancel/{booking_id}",
    tag = "Bookings",
    summary = "Cancel a booking",
    description = "Deletes the booking and redirects to `/bookings`. Storage failures are not reported to the client.",
    params(
        ("booking_id" = i64, Path, description = "Booking id"),
    ),
    responses(
        (status = 303, description = "Redirect to /bookings"),
        (status = 404, description = "Booking not found or id not an integer", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    uri: Uri,
    booking_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, BookingError> {
    let booking_id = BookingId::new(path_id(booking_id, &uri)?);
    let outcome = state.booking_service.cancel_booking(booking_id).await?;
    tracing::debug!(%booking_id, committed = outcome.is_committed(), "redirecting to booking list");

    Ok(Redirect::to(BOOKINGS_PAGE))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings))
        .route("/cancel/{booking_id}", post(cancel_booking))
}
