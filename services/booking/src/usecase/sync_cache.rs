use crate::domain::repository::SlotCacheRepository;
use crate::domain::types::{GameSnapshot, GameTimeSlot};
use crate::error::BookingServiceError;

// ── Push-sync from the course service ────────────────────────────────────────

pub struct SyncGameCacheUseCase<C: SlotCacheRepository> {
    pub cache: C,
}

impl<C: SlotCacheRepository> SyncGameCacheUseCase<C> {
    pub async fn execute(&self, game: GameSnapshot) -> Result<(), BookingServiceError> {
        self.cache.upsert_game(&game).await?;
        tracing::debug!(game_id = game.game_id, "game cache synced");
        Ok(())
    }
}

pub struct SyncTimeSlotCacheUseCase<C: SlotCacheRepository> {
    pub cache: C,
}

impl<C: SlotCacheRepository> SyncTimeSlotCacheUseCase<C> {
    pub async fn execute(&self, slot: GameTimeSlot) -> Result<(), BookingServiceError> {
        self.cache.upsert_slot(&slot).await?;
        tracing::debug!(
            game_time_slot_id = slot.game_time_slot_id,
            "game time slot cache synced"
        );
        Ok(())
    }
}
