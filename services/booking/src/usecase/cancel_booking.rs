use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{BookingRepository, MessageBus};
use crate::domain::types::{
    Booking, BookingStatus, CANCEL_WINDOW_DAYS, NotificationPayload, TOPIC_BOOKING_CANCELLED,
};
use crate::error::BookingServiceError;

pub struct CancelBookingInput {
    pub booking_id: i64,
    pub user_id: Uuid,
    pub user_role: u8,
    pub reason: Option<String>,
}

pub struct CancelBookingUseCase<B, M>
where
    B: BookingRepository,
    M: MessageBus,
{
    pub bookings: B,
    pub bus: M,
}

impl<B, M> CancelBookingUseCase<B, M>
where
    B: BookingRepository,
    M: MessageBus,
{
    pub async fn execute(&self, input: CancelBookingInput) -> Result<Booking, BookingServiceError> {
        let Some(booking) = self.bookings.find_by_id(input.booking_id).await? else {
            return Err(BookingServiceError::BookingNotFound);
        };
        if booking.user_id != input.user_id && input.user_role < 2 {
            return Err(BookingServiceError::Forbidden);
        }
        match booking.status {
            BookingStatus::Cancelled => return Err(BookingServiceError::AlreadyCancelled),
            BookingStatus::Confirmed => {}
            _ => return Err(BookingServiceError::InvalidStatus),
        }

        // Window check: the slot date must be at least CANCEL_WINDOW_DAYS away
        // (exactly at the boundary is allowed).
        let today = Utc::now().date_naive();
        let days_until = booking.slot_date.signed_duration_since(today).num_days();
        if days_until < CANCEL_WINDOW_DAYS {
            return Err(BookingServiceError::CancellationWindowClosed);
        }

        let applied = self
            .bookings
            .cancel(&booking, input.user_id, input.reason.as_deref())
            .await?;
        if !applied {
            // Someone else resolved the booking between the read and the
            // guarded update.
            return Err(BookingServiceError::InvalidStatus);
        }
        tracing::info!(
            booking_number = %booking.booking_number,
            "booking cancelled, slot release queued"
        );

        // Best-effort notification, outside the transaction.
        let payload = NotificationPayload::from_booking(&booking, Utc::now());
        match serde_json::to_value(&payload) {
            Ok(value) => {
                if let Err(e) = self.bus.publish(TOPIC_BOOKING_CANCELLED, &value).await {
                    tracing::warn!(
                        booking_id = booking.id,
                        error = %e,
                        "booking.cancelled notification failed"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(booking_id = booking.id, error = %e, "notification payload serialization failed");
            }
        }

        self.bookings
            .find_by_id(booking.id)
            .await?
            .ok_or(BookingServiceError::BookingNotFound)
    }
}
