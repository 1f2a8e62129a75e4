use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::GameTimeSlot;
use crate::error::BookingServiceError;
use crate::state::AppState;
use crate::usecase::availability::GetSlotAvailabilityUseCase;

#[derive(Serialize)]
pub struct TimeSlotResponse {
    pub game_time_slot_id: i64,
    pub game_id: i64,
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub max_players: i32,
    pub booked_players: i32,
    pub available_players: i32,
    pub unit_price: i64,
    pub is_available: bool,
    pub status: String,
}

impl From<GameTimeSlot> for TimeSlotResponse {
    fn from(slot: GameTimeSlot) -> Self {
        Self {
            game_time_slot_id: slot.game_time_slot_id,
            game_id: slot.game_id,
            slot_date: slot.slot_date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            max_players: slot.max_players,
            booked_players: slot.booked_players,
            available_players: slot.available_players,
            unit_price: slot.unit_price,
            is_available: slot.is_available,
            status: slot.status,
        }
    }
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    /// ISO date, YYYY-MM-DD.
    pub date: NaiveDate,
}

// ── GET /games/{game_id}/time-slots ──────────────────────────────────────────

pub async fn list_time_slots(
    State(state): State<AppState>,
    Path(game_id): Path<i64>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<TimeSlotResponse>>, BookingServiceError> {
    let usecase = GetSlotAvailabilityUseCase {
        cache: state.slot_cache_repo(),
        catalog: state.slot_catalog(),
    };
    let slots = usecase.execute(game_id, query.date).await?;
    Ok(Json(slots.into_iter().map(Into::into).collect()))
}
