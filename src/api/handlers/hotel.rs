//! Hotel handlers: list, detail, and booking a room from a hotel page.

use axum::extract::rejection::{FormRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::Uri;
use axum::response::{IntoResponse, Redirect};
use axum::routing::get;
use axum::{Form, Json, Router};

use super::{BOOKINGS_PAGE, path_id};
use crate::api::dto::{BookingForm, HotelListResponse, HotelView};
use crate::app_state::AppState;
use crate::domain::HotelId;
use crate::error::{BookingError, ErrorResponse};

/// `GET /`: List every hotel with its rooms.
///
/// # Errors
///
/// Returns [`BookingError::PersistenceError`] if the hotels cannot be read.
#[utoipa::path(
    get,
    path = "/",
    tag = "Hotels",
    summary = "List hotels",
    description = "Returns every hotel together with its rooms.",
    responses(
        (status = 200, description = "Hotel list", body = HotelListResponse),
    )
)]
pub async fn list_hotels(State(state): State<AppState>) -> Result<impl IntoResponse, BookingError> {
    let hotels = state.booking_service.list_hotels().await?;
    Ok(Json(HotelListResponse::from(hotels)))
}

/// `GET /hotel/{hotel_id}`: Hotel detail with its rooms.
///
/// # Errors
///
/// Returns [`BookingError::HotelNotFound`] if the hotel does not exist, or
/// [`BookingError::RouteNotFound`] if `hotel_id` is not an integer.
#[utoipa::path(
    get,
    path = "/hotel/{hotel_id}",
    tag = "Hotels",
    summary = "Get hotel details",
    description = "Returns one hotel and the rooms that can be booked in it.",
    params(
        ("hotel_id" = i64, Path, description = "Hotel id"),
    ),
    responses(
        (status = 200, description = "Hotel details", body = HotelView),
        (status = 404, description = "Hotel not found or id not an integer", body = ErrorResponse),
    )
)]
pub async fn get_hotel(
    State(state): State<AppState>,
    uri: Uri,
    hotel_id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, BookingError> {
    let hotel_id = HotelId::new(path_id(hotel_id, &uri)?);
    let hotel = state.booking_service.hotel(hotel_id).await?;
    Ok(Json(HotelView::from(hotel)))
}

/// `POST /hotel/{hotel_id}`: Book a room, then redirect to the booking list.
///
/// A booking that fails to commit is rolled back and counted, and the
/// client is redirected exactly as on success.
///
/// # Errors
///
/// Returns [`BookingError::HotelNotFound`] if the hotel does not exist,
/// [`BookingError::RouteNotFound`] if `hotel_id` is not an integer, or
/// [`BookingError::InvalidRequest`] for a missing or malformed form field.
#[utoipa::path(
    post,
    path = "/hotel/{hotel_id}",
    tag = "Bookings",
    summary = "Book a room",
    description = "Creates a booking for `room_id` on `date` and redirects to `/bookings`. Storage failures are not reported to the client.",
    params(
        ("hotel_id" = i64, Path, description = "Hotel id"),
    ),
    request_body(content = BookingForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to /bookings"),
        (status = 400, description = "Missing or invalid form field", body = ErrorResponse),
        (status = 404, description = "Hotel not found or id not an integer", body = ErrorResponse),
    )
)]
pub async fn book_room(
    State(state): State<AppState>,
    uri: Uri,
    hotel_id: Result<Path<i64>, PathRejection>,
    form: Result<Form<BookingForm>, FormRejection>,
) -> Result<impl IntoResponse, BookingError> {
    let hotel_id = HotelId::new(path_id(hotel_id, &uri)?);
    let parts = form
        .map_err(|rejection| BookingError::InvalidRequest(rejection.body_text()))
        .and_then(|Form(form)| form.into_parts());

    let (room_id, date) = match parts {
        Ok(parts) => parts,
        Err(e) => {
            // An unknown hotel is reported ahead of a bad form.
            state.booking_service.hotel(hotel_id).await?;
            return Err(e);
        }
    };

    let outcome = state
        .booking_service
        .book_room(hotel_id, room_id, &date)
        .await?;
    tracing::debug!(%hotel_id, committed = outcome.is_committed(), "redirecting to booking list");

    Ok(Redirect::to(BOOKINGS_PAGE))
}

/// Hotel routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_hotels))
        .route("/hotel/{hotel_id}", get(get_hotel).post(book_room))
}
