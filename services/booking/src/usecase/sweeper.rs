use chrono::{Duration, Utc};

use crate::domain::repository::BookingRepository;
use crate::domain::types::{HistoryAction, SAGA_TIMEOUT_REASON, SAGA_TIMEOUT_SECS};
use crate::error::BookingServiceError;

/// Forcibly fails bookings stuck in PENDING past the saga deadline, covering
/// reserve requests or callbacks lost on the bus. The deadline is purely
/// `created_at + SAGA_TIMEOUT_SECS`, evaluated against the wall clock here.
pub struct SweepTimedOutBookingsUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> SweepTimedOutBookingsUseCase<B> {
    pub async fn execute(&self) -> Result<usize, BookingServiceError> {
        let cutoff = Utc::now() - Duration::seconds(SAGA_TIMEOUT_SECS);
        let stale = self.bookings.list_timed_out(cutoff).await?;
        if stale.is_empty() {
            return Ok(0);
        }
        tracing::warn!(count = stale.len(), "found timed-out pending bookings");

        let mut swept = 0;
        for booking in &stale {
            // The guard loses to a callback that resolved the booking between
            // the list and this update — that is the intended outcome.
            let applied = self
                .bookings
                .fail(booking, SAGA_TIMEOUT_REASON, HistoryAction::SagaTimeout)
                .await?;
            if applied {
                tracing::info!(
                    booking_number = %booking.booking_number,
                    "booking failed on saga timeout"
                );
                swept += 1;
            }
        }
        Ok(swept)
    }
}
