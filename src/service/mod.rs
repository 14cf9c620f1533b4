//! Service layer: business logic orchestration.
//!
//! [`BookingService`] coordinates persistence calls and records their
//! outcomes in [`super::metrics::BookingMetrics`].

pub mod booking_service;

pub use booking_service::BookingService;
