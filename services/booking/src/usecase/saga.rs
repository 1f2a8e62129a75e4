use chrono::Utc;

use crate::domain::repository::{BookingRepository, MessageBus};
use crate::domain::types::{
    BookingStatus, HistoryAction, NotificationPayload, TOPIC_BOOKING_CONFIRMED,
};
use crate::error::BookingServiceError;

/// Callback payloads delivered by the course service. Duplicate or
/// out-of-order deliveries are absorbed by the guarded transitions below.
pub struct SlotReservedEvent {
    pub booking_id: i64,
    pub game_time_slot_id: i64,
    pub player_count: i32,
    pub reserved_at: String,
}

pub struct SlotReserveFailedEvent {
    pub booking_id: i64,
    pub game_time_slot_id: i64,
    pub reason: String,
}

pub struct SlotReleasedEvent {
    pub booking_id: i64,
    pub game_time_slot_id: i64,
    pub player_count: i32,
    pub released_at: String,
}

// ── slot.reserved → CONFIRMED ────────────────────────────────────────────────

pub struct HandleSlotReservedUseCase<B, M>
where
    B: BookingRepository,
    M: MessageBus,
{
    pub bookings: B,
    pub bus: M,
}

impl<B, M> HandleSlotReservedUseCase<B, M>
where
    B: BookingRepository,
    M: MessageBus,
{
    pub async fn execute(&self, event: SlotReservedEvent) -> Result<(), BookingServiceError> {
        let Some(booking) = self.bookings.find_by_id(event.booking_id).await? else {
            tracing::warn!(booking_id = event.booking_id, "slot.reserved for unknown booking");
            return Ok(());
        };
        if booking.status != BookingStatus::Pending {
            tracing::warn!(
                booking_id = booking.id,
                status = booking.status.as_str(),
                "ignoring slot.reserved for non-pending booking"
            );
            return Ok(());
        }

        let applied = self.bookings.confirm(&booking, &event.reserved_at).await?;
        if !applied {
            // Lost the race against a duplicate delivery or the timeout sweep.
            tracing::warn!(
                booking_id = booking.id,
                "confirm skipped, booking already resolved concurrently"
            );
            return Ok(());
        }
        tracing::info!(
            booking_number = %booking.booking_number,
            "booking confirmed"
        );

        // Best-effort notification, outside the transaction.
        let payload = NotificationPayload::from_booking(&booking, Utc::now());
        match serde_json::to_value(&payload) {
            Ok(value) => {
                if let Err(e) = self.bus.publish(TOPIC_BOOKING_CONFIRMED, &value).await {
                    tracing::warn!(
                        booking_id = booking.id,
                        error = %e,
                        "booking.confirmed notification failed"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(booking_id = booking.id, error = %e, "notification payload serialization failed");
            }
        }
        Ok(())
    }
}

// ── slot.reserve.failed → FAILED ─────────────────────────────────────────────

pub struct HandleSlotReserveFailedUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> HandleSlotReserveFailedUseCase<B> {
    pub async fn execute(&self, event: SlotReserveFailedEvent) -> Result<(), BookingServiceError> {
        let Some(booking) = self.bookings.find_by_id(event.booking_id).await? else {
            tracing::warn!(
                booking_id = event.booking_id,
                "slot.reserve.failed for unknown booking"
            );
            return Ok(());
        };
        if booking.status != BookingStatus::Pending {
            tracing::warn!(
                booking_id = booking.id,
                status = booking.status.as_str(),
                "ignoring slot.reserve.failed for non-pending booking"
            );
            return Ok(());
        }

        let applied = self
            .bookings
            .fail(&booking, &event.reason, HistoryAction::SagaFailed)
            .await?;
        if applied {
            tracing::info!(
                booking_number = %booking.booking_number,
                reason = %event.reason,
                "booking failed, slot reservation rejected"
            );
        } else {
            tracing::warn!(
                booking_id = booking.id,
                "fail skipped, booking already resolved concurrently"
            );
        }
        Ok(())
    }
}

// ── slot.released (compensation confirmation) ────────────────────────────────

pub struct HandleSlotReleasedUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> HandleSlotReleasedUseCase<B> {
    /// The local cancellation already restored the cache and transitioned the
    /// aggregate; this callback only confirms the remote side caught up.
    pub async fn execute(&self, event: SlotReleasedEvent) -> Result<(), BookingServiceError> {
        match self.bookings.find_by_id(event.booking_id).await? {
            Some(booking) => tracing::info!(
                booking_number = %booking.booking_number,
                game_time_slot_id = event.game_time_slot_id,
                player_count = event.player_count,
                "slot released by course service"
            ),
            None => tracing::warn!(
                booking_id = event.booking_id,
                "slot.released for unknown booking"
            ),
        }
        Ok(())
    }
}
