#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use parkgolf_domain::pagination::PageRequest;

use crate::domain::types::{
    Booking, BookingHistory, ContactPatch, GameSnapshot, GameTimeSlot, HistoryAction, NewBooking,
    OutboxEvent,
};
use crate::error::BookingServiceError;

/// Repository for the booking aggregate and its saga transitions.
///
/// Guarded transitions (`confirm`, `fail`, `cancel`) apply only if the row is
/// still in the expected source state and return `false` when the update lost
/// the race — the caller treats that as a no-op, never an error.
pub trait BookingRepository: Send + Sync {
    /// Insert a PENDING booking, its SAGA_STARTED history row, the
    /// `slot.reserve` outbox event and the idempotency key — one transaction.
    async fn create_pending(&self, booking: &NewBooking) -> Result<Booking, BookingServiceError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, BookingServiceError>;

    async fn find_by_number(
        &self,
        booking_number: &str,
    ) -> Result<Option<Booking>, BookingServiceError>;

    /// Resolve an unexpired idempotency key to the booking it produced.
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<Booking>, BookingServiceError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingServiceError>;

    async fn list_history(
        &self,
        booking_id: i64,
    ) -> Result<Vec<BookingHistory>, BookingServiceError>;

    /// Apply a contact patch and append an UPDATED history row.
    async fn update_contact(
        &self,
        booking: &Booking,
        patch: &ContactPatch,
        actor: Uuid,
    ) -> Result<(), BookingServiceError>;

    /// PENDING → CONFIRMED with SLOT_RESERVED + CONFIRMED history rows and
    /// slot cache counter adjustment, one transaction.
    async fn confirm(
        &self,
        booking: &Booking,
        reserved_at: &str,
    ) -> Result<bool, BookingServiceError>;

    /// PENDING → FAILED with the reason recorded and a history row
    /// (`SAGA_FAILED` or `SAGA_TIMEOUT`), one transaction.
    async fn fail(
        &self,
        booking: &Booking,
        reason: &str,
        action: HistoryAction,
    ) -> Result<bool, BookingServiceError>;

    /// CONFIRMED → CANCELLED with a CANCELLED history row, slot cache counter
    /// restore and a `slot.release` outbox event, one transaction.
    async fn cancel(
        &self,
        booking: &Booking,
        actor: Uuid,
        reason: Option<&str>,
    ) -> Result<bool, BookingServiceError>;

    /// Bookings still PENDING created before `cutoff` (sweeper input).
    async fn list_timed_out(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingServiceError>;
}

/// Repository for the transactional outbox.
pub trait OutboxRepository: Send + Sync {
    /// Claim up to `batch_size` PENDING events below the retry ceiling and
    /// mark them PROCESSING. Uses a skip-locked read so concurrent dispatcher
    /// instances never claim the same row.
    async fn claim_pending(
        &self,
        batch_size: u64,
        max_retries: i32,
    ) -> Result<Vec<OutboxEvent>, BookingServiceError>;

    async fn mark_sent(&self, event_id: Uuid) -> Result<(), BookingServiceError>;

    /// Record a dispatch failure. `permanent` moves the event to FAILED;
    /// otherwise it returns to PENDING for the next cycle.
    async fn record_failure(
        &self,
        event_id: Uuid,
        retry_count: i32,
        error: &str,
        permanent: bool,
    ) -> Result<(), BookingServiceError>;

    /// Delete SENT events processed before `cutoff`. Returns rows deleted.
    async fn purge_sent_before(&self, cutoff: DateTime<Utc>)
    -> Result<u64, BookingServiceError>;
}

/// Repository for the local game/slot read cache.
pub trait SlotCacheRepository: Send + Sync {
    async fn find_game(&self, game_id: i64) -> Result<Option<GameSnapshot>, BookingServiceError>;

    async fn find_slot(
        &self,
        game_time_slot_id: i64,
    ) -> Result<Option<GameTimeSlot>, BookingServiceError>;

    async fn list_slots(
        &self,
        game_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<GameTimeSlot>, BookingServiceError>;

    async fn upsert_game(&self, game: &GameSnapshot) -> Result<(), BookingServiceError>;

    async fn upsert_slot(&self, slot: &GameTimeSlot) -> Result<(), BookingServiceError>;
}

/// Port for synchronous pulls from the course service on cache miss.
pub trait SlotCatalogPort: Send + Sync {
    async fn fetch_game(&self, game_id: i64) -> Result<Option<GameSnapshot>, BookingServiceError>;

    async fn fetch_slot(
        &self,
        game_time_slot_id: i64,
    ) -> Result<Option<GameTimeSlot>, BookingServiceError>;
}

/// Acknowledgement for a request/reply dispatch.
#[derive(Debug, Clone)]
pub struct BusAck {
    pub success: bool,
    pub error: Option<String>,
}

/// Port for the inter-service message bus. `request` blocks for an ack with a
/// bounded timeout; `publish` is fire-and-forget.
pub trait MessageBus: Send + Sync {
    async fn request(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<BusAck, BookingServiceError>;

    async fn publish(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<(), BookingServiceError>;
}
