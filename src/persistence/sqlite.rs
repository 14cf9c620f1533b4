//! SQLite implementation of the persistence layer.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use super::seed::SAMPLE_HOTELS;
use crate::domain::{
    Booking, BookingDetail, BookingId, Hotel, HotelId, HotelWithRooms, Room, RoomId,
};
use crate::error::BookingError;

static MEMDB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Row shape of the hotel/room left join.
type HotelRoomRow = (
    i64,
    String,
    String,
    Option<i64>,
    Option<String>,
    Option<String>,
);

/// Row shape of the booking/room/hotel join.
type BookingDetailRow = (i64, i64, String, String, String, i64, String);

const LIST_HOTELS: &str = "SELECT h.id, h.name, h.location, r.id, r.number, r.type \
     FROM hotel h LEFT JOIN room r ON r.hotel_id = h.id \
     ORDER BY h.id, r.id";

const GET_HOTEL: &str = "SELECT h.id, h.name, h.location, r.id, r.number, r.type \
     FROM hotel h LEFT JOIN room r ON r.hotel_id = h.id \
     WHERE h.id = ? ORDER BY r.id";

/// SQLite-backed persistence layer using `sqlx::SqlitePool`.
///
/// Every booking write runs in its own transaction holding exactly one
/// statement. On failure the transaction is rolled back and the error is
/// returned to the caller.
#[derive(Debug, Clone)]
pub struct SqlitePersistence {
    pool: SqlitePool,
}

impl SqlitePersistence {
    /// Maximum time a file-backed connection may sit idle before it is closed.
    const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates a persistence layer over an existing pool.
    ///
    /// The schema is not touched; call [`Self::migrate`] if needed.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens the database at `path` and applies the embedded migrations.
    ///
    /// `":memory:"` opens a private in-memory database that lives as long
    /// as the returned handle.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] if the database cannot
    /// be opened or the schema cannot be created.
    pub async fn connect(
        path: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, BookingError> {
        let pool = if path == ":memory:" {
            // Each call gets its own shared-cache database so parallel
            // tests never see each other's rows.
            let id = MEMDB_COUNTER.fetch_add(1, Ordering::Relaxed);
            let memdb_url = format!(
                "sqlite:file:hotel-booking-memdb-{}-{}?mode=memory&cache=shared",
                std::process::id(),
                id
            );

            let options = memdb_url
                .parse::<SqliteConnectOptions>()?
                .foreign_keys(true);

            // The database vanishes with its last connection, so keep one
            // open for the lifetime of the pool.
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .acquire_timeout(acquire_timeout)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
                && let Err(e) = std::fs::create_dir_all(parent)
            {
                tracing::warn!(
                    path = %parent.display(),
                    error = %e,
                    "failed to create database directory"
                );
            }

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .foreign_keys(true);

            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .acquire_timeout(acquire_timeout)
                .idle_timeout(Some(Self::IDLE_TIMEOUT))
                .connect_with(options)
                .await?
        };

        tracing::info!(%path, "database connected");

        let persistence = Self::new(pool);
        persistence.migrate().await?;
        Ok(persistence)
    }

    /// Opens a fresh private in-memory database with the schema applied.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] on database failure.
    pub async fn in_memory() -> Result<Self, BookingError> {
        Self::connect(":memory:", 1, Duration::from_secs(5)).await
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the `hotel`, `room` and `booking` tables if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), BookingError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| BookingError::PersistenceError(e.to_string()))?;

        tracing::info!("database migrations checked/applied");
        Ok(())
    }

    /// Inserts the sample hotels and rooms if the `hotel` table is empty.
    ///
    /// Returns `true` if rows were inserted and `false` if the table
    /// already had data.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] on database failure.
    pub async fn seed_if_empty(&self) -> Result<bool, BookingError> {
        let existing = sqlx::query_scalar::<_, i64>("SELECT id FROM hotel LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            tracing::debug!("hotel table already populated; skipping seed");
            return Ok(false);
        }

        let mut tx = self.pool.begin().await?;
        let mut hotel_ids = Vec::with_capacity(SAMPLE_HOTELS.len());
        for hotel in &SAMPLE_HOTELS {
            let id = sqlx::query_scalar::<_, i64>(
                "INSERT INTO hotel (name, location) VALUES (?, ?) RETURNING id",
            )
            .bind(hotel.name)
            .bind(hotel.location)
            .fetch_one(&mut *tx)
            .await?;
            hotel_ids.push(id);
        }
        tx.commit().await?;

        let mut tx = self.pool.begin().await?;
        let mut room_count = 0usize;
        for (hotel, hotel_id) in SAMPLE_HOTELS.iter().zip(&hotel_ids) {
            for room in hotel.rooms {
                sqlx::query("INSERT INTO room (hotel_id, number, type) VALUES (?, ?, ?)")
                    .bind(*hotel_id)
                    .bind(room.number)
                    .bind(room.room_type)
                    .execute(&mut *tx)
                    .await?;
                room_count += 1;
            }
        }
        tx.commit().await?;

        tracing::info!(
            hotels = hotel_ids.len(),
            rooms = room_count,
            "seeded sample data"
        );
        Ok(true)
    }

    /// Loads every hotel with its rooms, ordered by hotel id.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] on database failure.
    pub async fn list_hotels(&self) -> Result<Vec<HotelWithRooms>, BookingError> {
        let rows = sqlx::query_as::<_, HotelRoomRow>(LIST_HOTELS)
            .fetch_all(&self.pool)
            .await?;

        Ok(group_hotel_rows(rows))
    }

    /// Loads one hotel with its rooms.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::HotelNotFound`] if no hotel has this id, or a
    /// [`BookingError::PersistenceError`] on database failure.
    pub async fn get_hotel(&self, id: HotelId) -> Result<HotelWithRooms, BookingError> {
        let rows = sqlx::query_as::<_, HotelRoomRow>(GET_HOTEL)
            .bind(id.get())
            .fetch_all(&self.pool)
            .await?;

        group_hotel_rows(rows)
            .into_iter()
            .next()
            .ok_or(BookingError::HotelNotFound(id.get()))
    }

    /// Inserts a booking and commits it.
    ///
    /// No check is made that the room is free on `date`.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] if the insert or commit
    /// fails (e.g. `room_id` references no room). The transaction is rolled
    /// back before returning.
    pub async fn create_booking(
        &self,
        room_id: RoomId,
        date: &str,
    ) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO booking (room_id, date) VALUES (?, ?) RETURNING id",
        )
        .bind(room_id.get())
        .bind(date)
        .fetch_one(&mut *tx)
        .await;

        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                rollback(tx).await;
                return Err(e.into());
            }
        };

        tx.commit().await?;

        Ok(Booking {
            id: BookingId::new(id),
            room_id,
            date: date.to_string(),
        })
    }

    /// Loads every booking joined with its room and hotel, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] on database failure.
    pub async fn list_bookings(&self) -> Result<Vec<BookingDetail>, BookingError> {
        let rows = sqlx::query_as::<_, BookingDetailRow>(
            "SELECT b.id, b.room_id, b.date, r.number, r.type, h.id, h.name \
             FROM booking b \
             JOIN room r ON r.id = b.room_id \
             JOIN hotel h ON h.id = r.hotel_id \
             ORDER BY b.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, room_id, date, room_number, room_type, hotel_id, hotel_name)| BookingDetail {
                    booking: Booking {
                        id: BookingId::new(id),
                        room_id: RoomId::new(room_id),
                        date,
                    },
                    room_number,
                    room_type,
                    hotel_id: HotelId::new(hotel_id),
                    hotel_name,
                },
            )
            .collect())
    }

    /// Loads one booking.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::BookingNotFound`] if no booking has this id,
    /// or a [`BookingError::PersistenceError`] on database failure.
    pub async fn get_booking(&self, id: BookingId) -> Result<Booking, BookingError> {
        let row = sqlx::query_as::<_, (i64, i64, String)>(
            "SELECT id, room_id, date FROM booking WHERE id = ?",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, room_id, date)| Booking {
            id: BookingId::new(id),
            room_id: RoomId::new(room_id),
            date,
        })
        .ok_or(BookingError::BookingNotFound(id.get()))
    }

    /// Deletes a booking and commits.
    ///
    /// Deleting an id that no longer exists commits an empty change.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] if the delete or commit
    /// fails. The transaction is rolled back before returning.
    pub async fn delete_booking(&self, id: BookingId) -> Result<(), BookingError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM booking WHERE id = ?")
            .bind(id.get())
            .execute(&mut *tx)
            .await;

        let result = match deleted {
            Ok(result) => result,
            Err(e) => {
                rollback(tx).await;
                return Err(e.into());
            }
        };

        tx.commit().await?;

        if result.rows_affected() == 0 {
            tracing::debug!(booking_id = %id, "delete matched no rows");
        }
        Ok(())
    }

    /// Returns the number of stored bookings.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] on database failure.
    pub async fn count_bookings(&self) -> Result<u64, BookingError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM booking")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// Rolls back a failed write, logging if the rollback itself fails.
async fn rollback(tx: Transaction<'_, Sqlite>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "rollback failed");
    }
}

/// Folds left-join rows (ordered by hotel id) into hotels with their rooms.
fn group_hotel_rows(rows: Vec<HotelRoomRow>) -> Vec<HotelWithRooms> {
    let mut hotels: Vec<HotelWithRooms> = Vec::new();
    for (hotel_id, name, location, room_id, number, room_type) in rows {
        let hotel_id = HotelId::new(hotel_id);
        let is_new = hotels.last().is_none_or(|h| h.hotel.id != hotel_id);
        if is_new {
            hotels.push(HotelWithRooms {
                hotel: Hotel {
                    id: hotel_id,
                    name,
                    location,
                },
                rooms: Vec::new(),
            });
        }
        if let (Some(room_id), Some(number), Some(room_type), Some(current)) =
            (room_id, number, room_type, hotels.last_mut())
        {
            current.rooms.push(Room {
                id: RoomId::new(room_id),
                hotel_id,
                number,
                room_type,
            });
        }
    }
    hotels
}
