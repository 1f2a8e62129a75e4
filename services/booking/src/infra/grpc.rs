use std::time::Duration;

use anyhow::Context as _;
use tonic::transport::Channel;

use parkgolf_proto::notification::{
    BookingNotification, notification_service_client::NotificationServiceClient,
};
use parkgolf_proto::slot::{
    self as pb, GetGameRequest, GetTimeSlotRequest, slot_service_client::SlotServiceClient,
};

use crate::domain::repository::{BusAck, MessageBus, SlotCatalogPort};
use crate::domain::types::{
    BUS_REQUEST_ATTEMPTS, BUS_REQUEST_TIMEOUT_MS, GameSnapshot, GameTimeSlot, NotificationPayload,
    ReleasePayload, ReservePayload, TOPIC_BOOKING_CANCELLED, TOPIC_BOOKING_CONFIRMED,
    TOPIC_SLOT_RELEASE, TOPIC_SLOT_RESERVE,
};
use crate::error::BookingServiceError;

// ── Message bus adapter ──────────────────────────────────────────────────────

/// Routes outbox topics to their gRPC endpoints: reserve/release go
/// request/reply to the course service, notification topics are published
/// fire-and-forget.
#[derive(Clone)]
pub struct GrpcSlotBus {
    slots: SlotServiceClient<Channel>,
    notifications: NotificationServiceClient<Channel>,
}

impl GrpcSlotBus {
    pub fn new(slot_channel: Channel, notification_channel: Channel) -> Self {
        Self {
            slots: SlotServiceClient::new(slot_channel),
            notifications: NotificationServiceClient::new(notification_channel),
        }
    }

    async fn request_once(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> anyhow::Result<BusAck> {
        let deadline = Duration::from_millis(BUS_REQUEST_TIMEOUT_MS);
        let ack = match topic {
            TOPIC_SLOT_RESERVE => {
                let p: ReservePayload = serde_json::from_value(payload.clone())
                    .context("decode slot.reserve payload")?;
                let request = pb::ReserveSlotRequest {
                    booking_id: p.booking_id,
                    booking_number: p.booking_number,
                    game_time_slot_id: p.game_time_slot_id,
                    player_count: p.player_count,
                    requested_at: p.requested_at.to_rfc3339(),
                };
                tokio::time::timeout(deadline, self.slots.clone().reserve_slot(request))
                    .await
                    .context("slot.reserve timed out")??
                    .into_inner()
            }
            TOPIC_SLOT_RELEASE => {
                let p: ReleasePayload = serde_json::from_value(payload.clone())
                    .context("decode slot.release payload")?;
                let request = pb::ReleaseSlotRequest {
                    booking_id: p.booking_id,
                    game_time_slot_id: p.game_time_slot_id,
                    player_count: p.player_count,
                    reason: p.reason,
                    requested_at: p.requested_at.to_rfc3339(),
                };
                tokio::time::timeout(deadline, self.slots.clone().release_slot(request))
                    .await
                    .context("slot.release timed out")??
                    .into_inner()
            }
            other => anyhow::bail!("topic {other} has no request/reply route"),
        };
        Ok(BusAck {
            success: ack.success,
            error: if ack.error.is_empty() {
                None
            } else {
                Some(ack.error)
            },
        })
    }
}

impl MessageBus for GrpcSlotBus {
    async fn request(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<BusAck, BookingServiceError> {
        let mut last_error = anyhow::anyhow!("no dispatch attempt made");
        for attempt in 1..=BUS_REQUEST_ATTEMPTS {
            match self.request_once(topic, payload).await {
                Ok(ack) => return Ok(ack),
                Err(e) => {
                    tracing::warn!(
                        topic,
                        attempt,
                        max = BUS_REQUEST_ATTEMPTS,
                        error = %e,
                        "bus request attempt failed"
                    );
                    last_error = e;
                }
            }
        }
        Err(last_error.into())
    }

    async fn publish(
        &self,
        topic: &str,
        payload: &serde_json::Value,
    ) -> Result<(), BookingServiceError> {
        match topic {
            TOPIC_BOOKING_CONFIRMED | TOPIC_BOOKING_CANCELLED => {
                let p: NotificationPayload = serde_json::from_value(payload.clone())
                    .map_err(|e| anyhow::anyhow!("decode notification payload: {e}"))?;
                let notification = BookingNotification {
                    booking_id: p.booking_id,
                    booking_number: p.booking_number,
                    user_id: p.user_id.to_string(),
                    game_id: p.game_id,
                    game_name: p.game_name,
                    slot_date: p.slot_date.to_string(),
                    start_time: p.start_time,
                    occurred_at: p.occurred_at.to_rfc3339(),
                    user_email: p.user_email,
                    user_name: p.user_name,
                };
                let result = if topic == TOPIC_BOOKING_CONFIRMED {
                    self.notifications.clone().booking_confirmed(notification).await
                } else {
                    self.notifications.clone().booking_cancelled(notification).await
                };
                result.map_err(|e| anyhow::anyhow!("gRPC notification publish failed: {e}"))?;
                Ok(())
            }
            other => Err(anyhow::anyhow!("topic {other} has no publish route").into()),
        }
    }
}

// ── Slot catalog adapter (cache-miss pulls) ──────────────────────────────────

#[derive(Clone)]
pub struct GrpcSlotCatalog {
    client: SlotServiceClient<Channel>,
}

impl GrpcSlotCatalog {
    pub fn new(channel: Channel) -> Self {
        Self {
            client: SlotServiceClient::new(channel),
        }
    }
}

impl SlotCatalogPort for GrpcSlotCatalog {
    async fn fetch_game(&self, game_id: i64) -> Result<Option<GameSnapshot>, BookingServiceError> {
        let response = self.client.clone().get_game(GetGameRequest { game_id }).await;
        match response {
            Ok(resp) => Ok(Some(resp.into_inner().into())),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!("gRPC get_game failed: {e}").into()),
        }
    }

    async fn fetch_slot(
        &self,
        game_time_slot_id: i64,
    ) -> Result<Option<GameTimeSlot>, BookingServiceError> {
        let response = self
            .client
            .clone()
            .get_time_slot(GetTimeSlotRequest { game_time_slot_id })
            .await;
        match response {
            Ok(resp) => Ok(Some(resp.into_inner().try_into()?)),
            Err(status) if status.code() == tonic::Code::NotFound => Ok(None),
            Err(e) => Err(anyhow::anyhow!("gRPC get_time_slot failed: {e}").into()),
        }
    }
}

impl From<pb::GameSnapshot> for GameSnapshot {
    fn from(game: pb::GameSnapshot) -> Self {
        Self {
            game_id: game.game_id,
            name: game.name,
            code: game.code,
            club_name: game.club_name,
            location: game.location,
            base_price: game.base_price,
            max_players: game.max_players,
            is_active: game.is_active,
        }
    }
}

impl TryFrom<pb::TimeSlotSnapshot> for GameTimeSlot {
    type Error = BookingServiceError;

    fn try_from(slot: pb::TimeSlotSnapshot) -> Result<Self, Self::Error> {
        let slot_date = slot
            .slot_date
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid slot_date from course service: {}", slot.slot_date))?;
        Ok(Self {
            game_time_slot_id: slot.game_time_slot_id,
            game_id: slot.game_id,
            slot_date,
            start_time: slot.start_time,
            end_time: slot.end_time,
            max_players: slot.max_players,
            booked_players: slot.booked_players,
            available_players: slot.available_players,
            unit_price: slot.unit_price,
            is_available: slot.is_available,
            status: slot.status,
        })
    }
}
