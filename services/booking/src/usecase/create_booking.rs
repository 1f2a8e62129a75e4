use uuid::Uuid;

use crate::domain::repository::{BookingRepository, SlotCacheRepository, SlotCatalogPort};
use crate::domain::types::{
    Booking, BookingStatus, GameSnapshot, GameTimeSlot, NewBooking, generate_booking_number,
    quote_price,
};
use crate::error::BookingServiceError;

pub struct CreateBookingInput {
    pub user_id: Uuid,
    pub game_time_slot_id: i64,
    pub player_count: i32,
    pub idempotency_key: String,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
}

/// Distinguishes a fresh booking from the two duplicate-request outcomes: a
/// key whose original request is still in flight, and one that already
/// resolved.
#[derive(Debug)]
pub enum CreateBookingOutcome {
    Created(Booking),
    AlreadyProcessing(Booking),
    Duplicate(Booking),
}

pub struct CreateBookingUseCase<B, C, P>
where
    B: BookingRepository,
    C: SlotCacheRepository,
    P: SlotCatalogPort,
{
    pub bookings: B,
    pub cache: C,
    pub catalog: P,
}

impl<B, C, P> CreateBookingUseCase<B, C, P>
where
    B: BookingRepository,
    C: SlotCacheRepository,
    P: SlotCatalogPort,
{
    pub async fn execute(
        &self,
        input: CreateBookingInput,
    ) -> Result<CreateBookingOutcome, BookingServiceError> {
        if input.idempotency_key.is_empty()
            || input.player_count < 1
            || input.user_email.is_empty()
            || input.user_name.is_empty()
        {
            return Err(BookingServiceError::MissingData);
        }

        // 1. Idempotency guard: a known, unexpired key short-circuits without
        //    any new side effects.
        if let Some(existing) = self
            .bookings
            .find_by_idempotency_key(&input.idempotency_key)
            .await?
        {
            return Ok(if existing.status == BookingStatus::Pending {
                CreateBookingOutcome::AlreadyProcessing(existing)
            } else {
                CreateBookingOutcome::Duplicate(existing)
            });
        }

        // 2. Resolve slot + game from the read cache, pulling from the course
        //    service on a cold miss so later requests hit the cache.
        let slot = self.resolve_slot(input.game_time_slot_id).await?;
        let game = self.resolve_game(slot.game_id).await?;

        // 3. Optimistic pre-validation; the course service makes the
        //    authoritative check when the reserve request arrives.
        if !slot.is_available {
            return Err(BookingServiceError::SlotUnavailable);
        }
        if slot.available_players < input.player_count {
            return Err(BookingServiceError::InsufficientCapacity);
        }

        // 4. Price + atomic create (booking, history, outbox, key).
        let quote = quote_price(slot.unit_price, input.player_count);
        let new_booking = NewBooking {
            booking_number: generate_booking_number(),
            user_id: input.user_id,
            game_id: game.game_id,
            game_time_slot_id: slot.game_time_slot_id,
            game_name: game.name,
            game_code: game.code,
            club_name: game.club_name,
            slot_date: slot.slot_date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            player_count: input.player_count,
            unit_price: quote.unit_price,
            service_fee: quote.service_fee,
            total_price: quote.total_price,
            idempotency_key: input.idempotency_key,
            user_email: input.user_email,
            user_name: input.user_name,
            user_phone: input.user_phone,
            special_requests: input.special_requests,
        };
        let booking = self.bookings.create_pending(&new_booking).await?;
        tracing::info!(
            booking_number = %booking.booking_number,
            game_time_slot_id = booking.game_time_slot_id,
            player_count = booking.player_count,
            "booking created, saga started"
        );
        Ok(CreateBookingOutcome::Created(booking))
    }

    async fn resolve_slot(
        &self,
        game_time_slot_id: i64,
    ) -> Result<GameTimeSlot, BookingServiceError> {
        if let Some(slot) = self.cache.find_slot(game_time_slot_id).await? {
            return Ok(slot);
        }
        let Some(slot) = self.catalog.fetch_slot(game_time_slot_id).await? else {
            return Err(BookingServiceError::SlotNotFound);
        };
        self.cache.upsert_slot(&slot).await?;
        Ok(slot)
    }

    async fn resolve_game(&self, game_id: i64) -> Result<GameSnapshot, BookingServiceError> {
        if let Some(game) = self.cache.find_game(game_id).await? {
            return Ok(game);
        }
        let Some(game) = self.catalog.fetch_game(game_id).await? else {
            return Err(BookingServiceError::GameNotFound);
        };
        self.cache.upsert_game(&game).await?;
        Ok(game)
    }
}
