use uuid::Uuid;

use crate::domain::repository::BookingRepository;
use crate::domain::types::{Booking, ContactPatch};
use crate::error::BookingServiceError;

pub struct UpdateBookingInput {
    pub booking_id: i64,
    pub user_id: Uuid,
    pub user_role: u8,
    pub patch: ContactPatch,
}

pub struct UpdateBookingUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> UpdateBookingUseCase<B> {
    pub async fn execute(&self, input: UpdateBookingInput) -> Result<Booking, BookingServiceError> {
        if input.patch.is_empty() {
            return Err(BookingServiceError::MissingData);
        }
        let booking = self
            .bookings
            .find_by_id(input.booking_id)
            .await?
            .ok_or(BookingServiceError::BookingNotFound)?;
        if booking.user_id != input.user_id && input.user_role < 2 {
            return Err(BookingServiceError::Forbidden);
        }
        if booking.status.is_terminal() {
            return Err(BookingServiceError::InvalidStatus);
        }

        self.bookings
            .update_contact(&booking, &input.patch, input.user_id)
            .await?;
        self.bookings
            .find_by_id(booking.id)
            .await?
            .ok_or(BookingServiceError::BookingNotFound)
    }
}
