//! Booking form and booking list views.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BookingDetail, RoomId};
use crate::error::BookingError;

/// Form body for `POST /hotel/{hotel_id}`.
///
/// Fields are optional at the parsing stage so that a missing field is
/// reported as [`BookingError::InvalidRequest`] rather than a framework
/// rejection.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookingForm {
    /// Id of the room to book.
    #[serde(default)]
    pub room_id: Option<String>,
    /// Requested date, stored as given.
    #[serde(default)]
    pub date: Option<String>,
}

impl BookingForm {
    /// Validates the form into a room id and date.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::InvalidRequest`] if `room_id` is missing or
    /// not an integer, or if `date` is missing.
    pub fn into_parts(self) -> Result<(RoomId, String), BookingError> {
        let raw_room = self
            .room_id
            .ok_or_else(|| BookingError::InvalidRequest("missing room_id".to_string()))?;
        let room_id = raw_room
            .parse::<RoomId>()
            .map_err(|_| BookingError::InvalidRequest(format!("invalid room_id: {raw_room}")))?;
        let date = self
            .date
            .ok_or_else(|| BookingError::InvalidRequest("missing date".to_string()))?;
        Ok((room_id, date))
    }
}

/// A booking with its room and hotel, as listed on the bookings page.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingView {
    /// Booking id, used by `POST /cancel/{booking_id}`.
    pub id: i64,
    /// Booked room id.
    pub room_id: i64,
    /// Booked date.
    pub date: String,
    /// Booked room number.
    pub room_number: String,
    /// Booked room category.
    pub room_type: String,
    /// Hotel owning the room.
    pub hotel_id: i64,
    /// Name of that hotel.
    pub hotel_name: String,
}

/// Response body for `GET /bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// All bookings.
    pub data: Vec<BookingView>,
    /// Number of bookings.
    pub total: usize,
}

impl From<BookingDetail> for BookingView {
    fn from(detail: BookingDetail) -> Self {
        Self {
            id: detail.booking.id.get(),
            room_id: detail.booking.room_id.get(),
            date: detail.booking.date,
            room_number: detail.room_number,
            room_type: detail.room_type,
            hotel_id: detail.hotel_id.get(),
            hotel_name: detail.hotel_name,
        }
    }
}

impl From<Vec<BookingDetail>> for BookingListResponse {
    fn from(bookings: Vec<BookingDetail>) -> Self {
        let data: Vec<BookingView> = bookings.into_iter().map(BookingView::from).collect();
        Self {
            total: data.len(),
            data,
        }
    }
}
