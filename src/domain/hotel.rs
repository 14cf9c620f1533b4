//! Hotels and the rooms they own.

use serde::Serialize;

use super::{HotelId, RoomId};

/// A hotel row.
///
/// Hotels are created by the startup seed only; no request mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hotel {
    /// Surrogate row id.
    pub id: HotelId,
    /// Display name (e.g. `"The Plaza"`).
    pub name: String,
    /// City the hotel is located in.
    pub location: String,
}

/// A bookable room inside a hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    /// Surrogate row id.
    pub id: RoomId,
    /// Owning hotel.
    pub hotel_id: HotelId,
    /// Room number as printed on the door (e.g. `"101"`).
    pub number: String,
    /// Room category (e.g. `"Standard"`, `"Suite"`, `"Deluxe"`).
    pub room_type: String,
}

/// A hotel together with all of its rooms, loaded by an explicit join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotelWithRooms {
    /// The hotel row.
    pub hotel: Hotel,
    /// Rooms whose `hotel_id` references this hotel, ordered by id.
    pub rooms: Vec<Room>,
}
