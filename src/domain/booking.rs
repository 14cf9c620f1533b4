//! Bookings and the outcome of booking writes.

use serde::Serialize;

use super::{BookingId, HotelId, RoomId};

/// A reservation of one room for one date.
///
/// The date is stored verbatim. Two bookings for the same room and date
/// are both accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    /// Surrogate row id.
    pub id: BookingId,
    /// Booked room.
    pub room_id: RoomId,
    /// Requested date, free-form.
    pub date: String,
}

/// A booking joined with its room and the room's hotel, for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingDetail {
    /// The booking row.
    pub booking: Booking,
    /// Number of the booked room.
    pub room_number: String,
    /// Category of the booked room.
    pub room_type: String,
    /// Hotel owning the booked room.
    pub hotel_id: HotelId,
    /// Name of that hotel.
    pub hotel_name: String,
}

/// Result of a booking write that did not fail the request.
///
/// A failed commit is rolled back and counted, but the caller still
/// proceeds as if it succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The write was committed.
    Committed,
    /// The write failed and was rolled back.
    RolledBack,
}

impl CommitOutcome {
    /// Returns `true` if the write was committed.
    #[must_use]
    pub const fn is_committed(self) -> bool {
        matches!(self, Self::Committed)
    }
}
