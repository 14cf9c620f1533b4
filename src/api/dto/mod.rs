//! Data Transfer Objects for request parsing and response rendering.
//!
//! Views flatten the domain's id newtypes to plain integers.

pub mod booking_dto;
pub mod hotel_dto;

pub use booking_dto::*;
pub use hotel_dto::*;
