//! Domain layer: hotels, rooms, bookings and their identifiers.
//!
//! Relationships are explicit foreign-key fields. Anything that needs a
//! hotel's rooms or a booking's hotel asks the persistence layer for a
//! joined view rather than walking object references.

pub mod booking;
pub mod hotel;
pub mod ids;

pub use booking::{Booking, BookingDetail, CommitOutcome};
pub use hotel::{Hotel, HotelWithRooms, Room};
pub use ids::{BookingId, HotelId, RoomId};
