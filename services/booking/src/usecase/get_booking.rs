use uuid::Uuid;

use parkgolf_domain::pagination::PageRequest;

use crate::domain::repository::BookingRepository;
use crate::domain::types::{Booking, BookingHistory};
use crate::error::BookingServiceError;

fn authorize(booking: &Booking, user_id: Uuid, user_role: u8) -> Result<(), BookingServiceError> {
    if booking.user_id != user_id && user_role < 1 {
        return Err(BookingServiceError::Forbidden);
    }
    Ok(())
}

// ── GetBooking ───────────────────────────────────────────────────────────────

pub struct GetBookingUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> GetBookingUseCase<B> {
    pub async fn execute(
        &self,
        booking_id: i64,
        user_id: Uuid,
        user_role: u8,
    ) -> Result<Booking, BookingServiceError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingServiceError::BookingNotFound)?;
        authorize(&booking, user_id, user_role)?;
        Ok(booking)
    }
}

// ── GetBookingByNumber ───────────────────────────────────────────────────────

pub struct GetBookingByNumberUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> GetBookingByNumberUseCase<B> {
    pub async fn execute(
        &self,
        booking_number: &str,
        user_id: Uuid,
        user_role: u8,
    ) -> Result<Booking, BookingServiceError> {
        let booking = self
            .bookings
            .find_by_number(booking_number)
            .await?
            .ok_or(BookingServiceError::BookingNotFound)?;
        authorize(&booking, user_id, user_role)?;
        Ok(booking)
    }
}

// ── ListMyBookings ───────────────────────────────────────────────────────────

pub struct ListMyBookingsUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> ListMyBookingsUseCase<B> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingServiceError> {
        self.bookings.list_by_user(user_id, page).await
    }
}

// ── GetBookingHistory ────────────────────────────────────────────────────────

pub struct GetBookingHistoryUseCase<B: BookingRepository> {
    pub bookings: B,
}

impl<B: BookingRepository> GetBookingHistoryUseCase<B> {
    pub async fn execute(
        &self,
        booking_id: i64,
        user_id: Uuid,
        user_role: u8,
    ) -> Result<Vec<BookingHistory>, BookingServiceError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingServiceError::BookingNotFound)?;
        authorize(&booking, user_id, user_role)?;
        self.bookings.list_history(booking.id).await
    }
}
