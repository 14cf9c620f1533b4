//! Hotel and room views for the listing and detail endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{HotelWithRooms, Room};

/// A room as shown on a hotel page.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomView {
    /// Room id, submitted back as `room_id` when booking.
    pub id: i64,
    /// Owning hotel id.
    pub hotel_id: i64,
    /// Room number.
    pub number: String,
    /// Room category.
    pub room_type: String,
}

/// A hotel with its rooms.
#[derive(Debug, Serialize, ToSchema)]
pub struct HotelView {
    /// Hotel id.
    pub id: i64,
    /// Hotel name.
    pub name: String,
    /// Hotel location.
    pub location: String,
    /// Rooms in this hotel.
    pub rooms: Vec<RoomView>,
}

/// Response body for `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HotelListResponse {
    /// All hotels.
    pub data: Vec<HotelView>,
    /// Number of hotels.
    pub total: usize,
}

impl From<Room> for RoomView {
    fn from(room: Room) -> Self {
        Self {
            id: room.id.get(),
            hotel_id: room.hotel_id.get(),
            number: room.number,
            room_type: room.room_type,
        }
    }
}

impl From<HotelWithRooms> for HotelView {
    fn from(value: HotelWithRooms) -> Self {
        Self {
            id: value.hotel.id.get(),
            name: value.hotel.name,
            location: value.hotel.location,
            rooms: value.rooms.into_iter().map(RoomView::from).collect(),
        }
    }
}

impl From<Vec<HotelWithRooms>> for HotelListResponse {
    fn from(hotels: Vec<HotelWithRooms>) -> Self {
        let data: Vec<HotelView> = hotels.into_iter().map(HotelView::from).collect();
        Self {
            total: data.len(),
            data,
        }
    }
}
