use chrono::NaiveDate;

use crate::domain::repository::{SlotCacheRepository, SlotCatalogPort};
use crate::domain::types::GameTimeSlot;
use crate::error::BookingServiceError;

/// Lists a game's time slots for a date from the local read cache. The cache
/// is good enough for listings; the authoritative capacity check happens when
/// the reserve request reaches the course service.
pub struct GetSlotAvailabilityUseCase<C, P>
where
    C: SlotCacheRepository,
    P: SlotCatalogPort,
{
    pub cache: C,
    pub catalog: P,
}

impl<C, P> GetSlotAvailabilityUseCase<C, P>
where
    C: SlotCacheRepository,
    P: SlotCatalogPort,
{
    pub async fn execute(
        &self,
        game_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<GameTimeSlot>, BookingServiceError> {
        // Game existence check keeps a 404 distinct from an empty day.
        if self.cache.find_game(game_id).await?.is_none() {
            let Some(game) = self.catalog.fetch_game(game_id).await? else {
                return Err(BookingServiceError::GameNotFound);
            };
            self.cache.upsert_game(&game).await?;
        }
        self.cache.list_slots(game_id, date).await
    }
}
