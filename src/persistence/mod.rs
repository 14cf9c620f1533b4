//! Persistence layer: SQLite storage for hotels, rooms and bookings.
//!
//! [`SqlitePersistence`] wraps a `sqlx::SqlitePool`. Reads return domain
//! types directly; each booking write is a single statement committed in
//! its own transaction. The schema is applied from the embedded
//! `migrations/` directory at connect time.

pub mod seed;
pub mod sqlite;

pub use sqlite::SqlitePersistence;
