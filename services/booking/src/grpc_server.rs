use tonic::{Request, Response, Status};

use parkgolf_proto::slot::{
    Empty, GameSnapshot as PbGameSnapshot, SlotReleasedEvent, SlotReserveFailedEvent,
    SlotReservedEvent, TimeSlotSnapshot, booking_callback_service_server::BookingCallbackService,
};

use crate::state::AppState;
use crate::usecase::saga::{
    self, HandleSlotReleasedUseCase, HandleSlotReserveFailedUseCase, HandleSlotReservedUseCase,
};
use crate::usecase::sync_cache::{SyncGameCacheUseCase, SyncTimeSlotCacheUseCase};

/// Inbound callbacks from the course service: saga resolution events and
/// cache push-sync. Duplicate deliveries are absorbed by the usecases'
/// guarded transitions, so every handler is safe to retry.
#[derive(Clone)]
pub struct BookingGrpcServer {
    pub state: AppState,
}

#[tonic::async_trait]
impl BookingCallbackService for BookingGrpcServer {
    async fn slot_reserved(
        &self,
        request: Request<SlotReservedEvent>,
    ) -> Result<Response<Empty>, Status> {
        let event = request.into_inner();
        let uc = HandleSlotReservedUseCase {
            bookings: self.state.booking_repo(),
            bus: self.state.bus(),
        };
        uc.execute(saga::SlotReservedEvent {
            booking_id: event.booking_id,
            game_time_slot_id: event.game_time_slot_id,
            player_count: event.player_count,
            reserved_at: event.reserved_at,
        })
        .await
        .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(Empty {}))
    }

    async fn slot_reserve_failed(
        &self,
        request: Request<SlotReserveFailedEvent>,
    ) -> Result<Response<Empty>, Status> {
        let event = request.into_inner();
        let uc = HandleSlotReserveFailedUseCase {
            bookings: self.state.booking_repo(),
        };
        uc.execute(saga::SlotReserveFailedEvent {
            booking_id: event.booking_id,
            game_time_slot_id: event.game_time_slot_id,
            reason: event.reason,
        })
        .await
        .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(Empty {}))
    }

    async fn slot_released(
        &self,
        request: Request<SlotReleasedEvent>,
    ) -> Result<Response<Empty>, Status> {
        let event = request.into_inner();
        let uc = HandleSlotReleasedUseCase {
            bookings: self.state.booking_repo(),
        };
        uc.execute(saga::SlotReleasedEvent {
            booking_id: event.booking_id,
            game_time_slot_id: event.game_time_slot_id,
            player_count: event.player_count,
            released_at: event.released_at,
        })
        .await
        .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(Empty {}))
    }

    async fn sync_game(
        &self,
        request: Request<PbGameSnapshot>,
    ) -> Result<Response<Empty>, Status> {
        let game = request.into_inner();
        let uc = SyncGameCacheUseCase {
            cache: self.state.slot_cache_repo(),
        };
        uc.execute(game.into())
            .await
            .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(Empty {}))
    }

    async fn sync_time_slot(
        &self,
        request: Request<TimeSlotSnapshot>,
    ) -> Result<Response<Empty>, Status> {
        let slot = request
            .into_inner()
            .try_into()
            .map_err(|_| Status::invalid_argument("invalid slot_date"))?;
        let uc = SyncTimeSlotCacheUseCase {
            cache: self.state.slot_cache_repo(),
        };
        uc.execute(slot)
            .await
            .map_err(|e| Status::internal(e.to_string()))?;
        Ok(Response::new(Empty {}))
    }
}
