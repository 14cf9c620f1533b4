//! Booking service: orchestrates persistence calls and metric updates.

use std::sync::Arc;

use crate::domain::{BookingDetail, BookingId, CommitOutcome, HotelId, HotelWithRooms, RoomId};
use crate::error::BookingError;
use crate::metrics::BookingMetrics;
use crate::persistence::SqlitePersistence;

/// Orchestration layer for all booking operations.
///
/// Owns the store and a shared handle to [`BookingMetrics`]. Writes
/// follow one pattern: look up the parent row (not found is an error),
/// attempt the single-statement write, then count the outcome. A failed
/// write is rolled back by the store, counted here, and reported as
/// [`CommitOutcome::RolledBack`] rather than as an error.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: SqlitePersistence,
    metrics: Arc<BookingMetrics>,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(store: SqlitePersistence, metrics: Arc<BookingMetrics>) -> Self {
        Self { store, metrics }
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn store(&self) -> &SqlitePersistence {
        &self.store
    }

    /// Returns a reference to the shared metrics.
    #[must_use]
    pub fn metrics(&self) -> &Arc<BookingMetrics> {
        &self.metrics
    }

    /// Lists every hotel with its rooms.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] on database failure.
    pub async fn list_hotels(&self) -> Result<Vec<HotelWithRooms>, BookingError> {
        self.store.list_hotels().await
    }

    /// Loads one hotel with its rooms.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::HotelNotFound`] for an unknown id.
    pub async fn hotel(&self, hotel_id: HotelId) -> Result<HotelWithRooms, BookingError> {
        self.store.get_hotel(hotel_id).await
    }

    /// Books `room_id` on `date` from the page of `hotel_id`.
    ///
    /// The room is not required to belong to the hotel, and an already
    /// booked room/date pair is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::HotelNotFound`] for an unknown hotel. A
    /// failed insert is not an error: it yields
    /// [`CommitOutcome::RolledBack`].
    pub async fn book_room(
        &self,
        hotel_id: HotelId,
        room_id: RoomId,
        date: &str,
    ) -> Result<CommitOutcome, BookingError> {
        self.store.get_hotel(hotel_id).await?;

        match self.store.create_booking(room_id, date).await {
            Ok(booking) => {
                self.metrics.record_booking_created();
                tracing::info!(
                    booking_id = %booking.id,
                    %hotel_id,
                    %room_id,
                    date,
                    "booking created"
                );
                Ok(CommitOutcome::Committed)
            }
            Err(e) => {
                self.metrics.record_commit_failure();
                tracing::warn!(
                    %hotel_id,
                    %room_id,
                    date,
                    error = %e,
                    "booking commit failed; rolled back"
                );
                Ok(CommitOutcome::RolledBack)
            }
        }
    }

    /// Lists every booking and refreshes the `total_bookings` gauge.
    ///
    /// # Errors
    ///
    /// Returns a [`BookingError::PersistenceError`] on database failure;
    /// the gauge is left untouched in that case.
    pub async fn list_bookings(&self) -> Result<Vec<BookingDetail>, BookingError> {
        let bookings = self.store.list_bookings().await?;
        self.metrics.set_total_bookings(bookings.len());
        Ok(bookings)
    }

    /// Cancels an existing booking.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::BookingNotFound`] for an unknown id. A
    /// failed delete is not an error: it yields
    /// [`CommitOutcome::RolledBack`].
    pub async fn cancel_booking(
        &self,
        booking_id: BookingId,
    ) -> Result<CommitOutcome, BookingError> {
        let booking = self.store.get_booking(booking_id).await?;

        match self.store.delete_booking(booking.id).await {
            Ok(()) => {
                self.metrics.record_booking_canceled();
                tracing::info!(%booking_id, room_id = %booking.room_id, "booking canceled");
                Ok(CommitOutcome::Committed)
            }
            Err(e) => {
                self.metrics.record_commit_failure();
                tracing::warn!(%booking_id, error = %e, "cancel commit failed; rolled back");
                Ok(CommitOutcome::RolledBack)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    async fn make_service() -> BookingService {
        let Ok(store) = SqlitePersistence::in_memory().await else {
            panic!("in-memory database should open");
        };
        let Ok(true) = store.seed_if_empty().await else {
            panic!("fresh database should seed");
        };
        let Ok(metrics) = BookingMetrics::new() else {
            panic!("metrics registry should build");
        };
        BookingService::new(store, Arc::new(metrics))
    }

    async fn first_room(service: &BookingService) -> (HotelId, RoomId) {
        let Ok(hotels) = service.list_hotels().await else {
            panic!("list hotels failed");
        };
        let Some((hotel, room)) = hotels
            .first()
            .and_then(|h| h.rooms.first().map(|r| (h.hotel.id, r.id)))
        else {
            panic!("seeded hotel has no rooms");
        };
        (hotel, room)
    }

    #[tokio::test]
    async fn book_room_commits_and_counts() {
        let service = make_service().await;
        let (hotel, room) = first_room(&service).await;

        let result = service.book_room(hotel, room, "2024-01-01").await;
        assert!(matches!(result, Ok(CommitOutcome::Committed)));

        let metrics = service.metrics();
        assert_eq!(metrics.db_commits(), 1);
        assert_eq!(metrics.new_bookings(), 1);
        assert_eq!(metrics.db_commit_failures(), 0);
        assert!(matches!(service.store().count_bookings().await, Ok(1)));
    }

    #[tokio::test]
    async fn book_room_unknown_hotel_is_not_found_and_uncounted() {
        let service = make_service().await;
        let (_, room) = first_room(&service).await;

        let result = service
            .book_room(HotelId::new(404), room, "2024-01-01")
            .await;
        assert!(matches!(result, Err(BookingError::HotelNotFound(404))));

        let metrics = service.metrics();
        assert_eq!(metrics.db_commits(), 0);
        assert_eq!(metrics.db_commit_failures(), 0);
        assert!(matches!(service.store().count_bookings().await, Ok(0)));
    }

    #[tokio::test]
    async fn failed_insert_is_swallowed_and_counted() {
        let service = make_service().await;
        let (hotel, _) = first_room(&service).await;

        let result = service
            .book_room(hotel, RoomId::new(12_345), "2024-01-01")
            .await;
        assert!(matches!(result, Ok(CommitOutcome::RolledBack)));

        let metrics = service.metrics();
        assert_eq!(metrics.db_commit_failures(), 1);
        assert_eq!(metrics.db_commits(), 0);
        assert_eq!(metrics.new_bookings(), 0);
        assert!(matches!(service.store().count_bookings().await, Ok(0)));
    }

    #[tokio::test]
    async fn list_bookings_refreshes_gauge() {
        let service = make_service().await;
        let (hotel, room) = first_room(&service).await;

        for _ in 0..3 {
            assert!(service.book_room(hotel, room, "2024-02-02").await.is_ok());
        }
        // Writes alone do not move the gauge.
        assert_eq!(service.metrics().total_bookings(), 0);

        let Ok(bookings) = service.list_bookings().await else {
            panic!("list bookings failed");
        };
        assert_eq!(bookings.len(), 3);
        assert_eq!(service.metrics().total_bookings(), 3);
    }

    #[tokio::test]
    async fn cancel_booking_commits_and_counts() {
        let service = make_service().await;
        let (hotel, room) = first_room(&service).await;
        assert!(service.book_room(hotel, room, "2024-03-03").await.is_ok());

        let Ok(bookings) = service.list_bookings().await else {
            panic!("list bookings failed");
        };
        let Some(booking_id) = bookings.first().map(|b| b.booking.id) else {
            panic!("booking missing");
        };

        let result = service.cancel_booking(booking_id).await;
        assert!(matches!(result, Ok(CommitOutcome::Committed)));

        let metrics = service.metrics();
        assert_eq!(metrics.canceled_bookings(), 1);
        assert_eq!(metrics.db_commits(), 2);
        assert!(matches!(service.store().count_bookings().await, Ok(0)));
    }

    #[tokio::test]
    async fn failed_delete_is_swallowed_and_counted() {
        let service = make_service().await;
        let (hotel, room) = first_room(&service).await;
        assert!(service.book_room(hotel, room, "2024-05-05").await.is_ok());
        let Ok(bookings) = service.list_bookings().await else {
            panic!("list bookings failed");
        };
        let Some(booking_id) = bookings.first().map(|b| b.booking.id) else {
            panic!("booking missing");
        };

        let trigger = sqlx::query(
            "CREATE TRIGGER booking_no_delete BEFORE DELETE ON booking \
             BEGIN SELECT RAISE(ABORT, 'deletes disabled'); END",
        )
        .execute(service.store().pool())
        .await;
        assert!(trigger.is_ok());

        let result = service.cancel_booking(booking_id).await;
        assert!(matches!(result, Ok(CommitOutcome::RolledBack)));

        let metrics = service.metrics();
        assert_eq!(metrics.db_commit_failures(), 1);
        assert_eq!(metrics.canceled_bookings(), 0);
        assert_eq!(metrics.db_commits(), 1);
        assert!(service.store().get_booking(booking_id).await.is_ok());
    }

    #[tokio::test]
    async fn cancel_unknown_booking_changes_nothing() {
        let service = make_service().await;

        let result = service.cancel_booking(BookingId::new(77)).await;
        assert!(matches!(result, Err(BookingError::BookingNotFound(77))));

        let metrics = service.metrics();
        assert_eq!(metrics.db_commits(), 0);
        assert_eq!(metrics.db_commit_failures(), 0);
        assert_eq!(metrics.canceled_bookings(), 0);
    }

    #[tokio::test]
    async fn cancel_twice_is_not_found_the_second_time() {
        let service = make_service().await;
        let (hotel, room) = first_room(&service).await;
        assert!(service.book_room(hotel, room, "2024-04-04").await.is_ok());
        let Ok(bookings) = service.list_bookings().await else {
            panic!("list bookings failed");
        };
        let Some(booking_id) = bookings.first().map(|b| b.booking.id) else {
            panic!("booking missing");
        };

        assert!(service.cancel_booking(booking_id).await.is_ok());
        assert!(matches!(
            service.cancel_booking(booking_id).await,
            Err(BookingError::BookingNotFound(_))
        ));
        assert_eq!(service.metrics().canceled_bookings(), 1);
    }
}
