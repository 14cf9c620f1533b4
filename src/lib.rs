//! # hotel-booking
//!
//! Hotel room booking web service: browse hotels, view their rooms, book a
//! room for a date, list and cancel bookings. Booking writes and requests
//! are instrumented with Prometheus counters.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP)
//!     │
//!     ├── Request accounting (api/accounting)
//!     ├── Handlers (api/handlers)
//!     │
//!     ├── BookingService (service/) ──► BookingMetrics (metrics)
//!     │
//!     └── SQLite Persistence (persistence/)
//! ```
//!
//! A booking or cancellation that fails to commit is rolled back and counted
//! in `db_commit_failures_total`; the client is still redirected to the
//! booking list as if it had succeeded.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod persistence;
pub mod service;
