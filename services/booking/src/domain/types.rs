use chrono::{DateTime, NaiveDate, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

// ── Saga protocol constants ──────────────────────────────────────────────────

/// Outbox poll interval.
pub const OUTBOX_POLL_INTERVAL_MS: u64 = 1000;

/// Events claimed per dispatcher cycle.
pub const OUTBOX_BATCH_SIZE: u64 = 10;

/// Dispatch attempts before an outbox event is failed permanently.
pub const OUTBOX_MAX_RETRIES: i32 = 5;

/// Retention window for SENT outbox events, purged by the cleanup job.
pub const OUTBOX_RETENTION_DAYS: i64 = 7;

/// Cleanup job interval.
pub const OUTBOX_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// Request/reply timeout on the bus.
pub const BUS_REQUEST_TIMEOUT_MS: u64 = 5000;

/// Transport-level attempts per request/reply dispatch.
pub const BUS_REQUEST_ATTEMPTS: u32 = 2;

/// A booking still PENDING this long after creation is failed by the sweeper.
pub const SAGA_TIMEOUT_SECS: i64 = 60;

/// Sweeper interval.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// Idempotency key time-to-live.
pub const IDEMPOTENCY_KEY_TTL_HOURS: i64 = 24;

/// Service fee, percent of the slot subtotal, rounded down.
pub const SERVICE_FEE_PERCENT: i64 = 10;

/// Cancellation is allowed only while the slot date is at least this many
/// days away.
pub const CANCEL_WINDOW_DAYS: i64 = 3;

/// Random part length of a booking number.
pub const BOOKING_NUMBER_LEN: usize = 12;

/// Fail reason recorded by the timeout sweeper.
pub const SAGA_TIMEOUT_REASON: &str = "saga timeout - slot reservation not confirmed in time";

// ── Bus topics ───────────────────────────────────────────────────────────────

pub const TOPIC_SLOT_RESERVE: &str = "slot.reserve";
pub const TOPIC_SLOT_RELEASE: &str = "slot.release";
pub const TOPIC_BOOKING_CONFIRMED: &str = "booking.confirmed";
pub const TOPIC_BOOKING_CANCELLED: &str = "booking.cancelled";

/// Topics the dispatcher sends request/reply and waits for an ack; everything
/// else is fire-and-forget.
pub fn is_request_reply(topic: &str) -> bool {
    matches!(topic, TOPIC_SLOT_RESERVE | TOPIC_SLOT_RELEASE)
}

// ── Booking status machine ───────────────────────────────────────────────────

/// Saga lifecycle states of a booking. Transitions are monotone; the only
/// backward edge is `Confirmed → Cancelled` (compensation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Failed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "CONFIRMED" => Some(Self::Confirmed),
            "FAILED" => Some(Self::Failed),
            "CANCELLED" => Some(Self::Cancelled),
            "COMPLETED" => Some(Self::Completed),
            _ => None,
        }
    }

    /// No edge ever leaves these states.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::Completed)
    }
}

/// Audit actions recorded in booking history rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    SagaStarted,
    SlotReserved,
    Confirmed,
    SagaFailed,
    SagaTimeout,
    Cancelled,
    Updated,
}

impl HistoryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SagaStarted => "SAGA_STARTED",
            Self::SlotReserved => "SLOT_RESERVED",
            Self::Confirmed => "CONFIRMED",
            Self::SagaFailed => "SAGA_FAILED",
            Self::SagaTimeout => "SAGA_TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Updated => "UPDATED",
        }
    }
}

/// Outbox event delivery states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboxStatus {
    Pending,
    Processing,
    Sent,
    Failed,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Processing => "PROCESSING",
            Self::Sent => "SENT",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "PROCESSING" => Some(Self::Processing),
            "SENT" => Some(Self::Sent),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

// ── Aggregates ───────────────────────────────────────────────────────────────

/// Booking aggregate as the usecase layer sees it.
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i64,
    pub booking_number: String,
    pub user_id: Uuid,
    pub game_id: i64,
    pub game_time_slot_id: i64,
    pub game_name: String,
    pub game_code: String,
    pub club_name: String,
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub player_count: i32,
    pub unit_price: i64,
    pub service_fee: i64,
    pub total_price: i64,
    pub status: BookingStatus,
    pub idempotency_key: String,
    pub saga_fail_reason: Option<String>,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to create a booking; id/status/timestamps are assigned
/// by the repository inside the create transaction.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub booking_number: String,
    pub user_id: Uuid,
    pub game_id: i64,
    pub game_time_slot_id: i64,
    pub game_name: String,
    pub game_code: String,
    pub club_name: String,
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub player_count: i32,
    pub unit_price: i64,
    pub service_fee: i64,
    pub total_price: i64,
    pub idempotency_key: String,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingHistory {
    pub id: i64,
    pub booking_id: i64,
    pub action: String,
    pub details: serde_json::Value,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct OutboxEvent {
    pub id: Uuid,
    pub aggregate_type: String,
    pub aggregate_id: i64,
    pub event_type: String,
    pub payload: serde_json::Value,
    pub status: OutboxStatus,
    pub retry_count: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

/// Contact fields a caller may change after creation.
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
}

impl ContactPatch {
    pub fn is_empty(&self) -> bool {
        self.user_email.is_none()
            && self.user_name.is_none()
            && self.user_phone.is_none()
            && self.special_requests.is_none()
    }
}

// ── Cache projections ────────────────────────────────────────────────────────

/// Local mirror of a game owned by the course service.
#[derive(Debug, Clone)]
pub struct GameSnapshot {
    pub game_id: i64,
    pub name: String,
    pub code: String,
    pub club_name: String,
    pub location: String,
    pub base_price: i64,
    pub max_players: i32,
    pub is_active: bool,
}

/// Local mirror of a game time slot.
#[derive(Debug, Clone)]
pub struct GameTimeSlot {
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

// ── Pricing ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceQuote {
    pub unit_price: i64,
    pub service_fee: i64,
    pub total_price: i64,
}

/// Price in minor currency units: unit price × party size plus a
/// fixed-percentage service fee, fee rounded down.
pub fn quote_price(unit_price: i64, player_count: i32) -> PriceQuote {
    let subtotal = unit_price * i64::from(player_count);
    let service_fee = subtotal * SERVICE_FEE_PERCENT / 100;
    PriceQuote {
        unit_price,
        service_fee,
        total_price: subtotal + service_fee,
    }
}

// ── Booking numbers ──────────────────────────────────────────────────────────

/// Charset for booking number generation (uppercase alphanumeric).
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate an externally visible booking number. Random, never sequential,
/// so numbers cannot be enumerated or guessed; uniqueness is enforced by the
/// database.
pub fn generate_booking_number() -> String {
    let mut rng = rand::rng();
    let random: String = (0..BOOKING_NUMBER_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect();
    format!("BK-{random}")
}

// ── Wire payloads (outbox events and notifications) ──────────────────────────

/// `slot.reserve` request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservePayload {
    pub booking_id: i64,
    pub booking_number: String,
    pub game_time_slot_id: i64,
    pub player_count: i32,
    pub requested_at: DateTime<Utc>,
}

/// `slot.release` request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleasePayload {
    pub booking_id: i64,
    pub game_time_slot_id: i64,
    pub player_count: i32,
    pub reason: String,
    pub requested_at: DateTime<Utc>,
}

/// `booking.confirmed` / `booking.cancelled` notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub booking_id: i64,
    pub booking_number: String,
    pub user_id: Uuid,
    pub game_id: i64,
    pub game_name: String,
    pub slot_date: NaiveDate,
    pub start_time: String,
    pub occurred_at: DateTime<Utc>,
    pub user_email: String,
    pub user_name: String,
}

impl NotificationPayload {
    pub fn from_booking(booking: &Booking, occurred_at: DateTime<Utc>) -> Self {
        Self {
            booking_id: booking.id,
            booking_number: booking.booking_number.clone(),
            user_id: booking.user_id,
            game_id: booking.game_id,
            game_name: booking.game_name.clone(),
            slot_date: booking.slot_date,
            start_time: booking.start_time.clone(),
            occurred_at,
            user_email: booking.user_email.clone(),
            user_name: booking.user_name.clone(),
        }
    }
}

/// Build the `slot.reserve` outbox payload for a freshly inserted booking.
pub fn reserve_event_payload(
    booking_id: i64,
    booking_number: &str,
    game_time_slot_id: i64,
    player_count: i32,
    requested_at: DateTime<Utc>,
) -> serde_json::Value {
    json!({
        "bookingId": booking_id,
        "bookingNumber": booking_number,
        "gameTimeSlotId": game_time_slot_id,
        "playerCount": player_count,
        "requestedAt": requested_at,
    })
}

/// Build the `slot.release` outbox payload for a cancelled booking.
pub fn release_event_payload(
    booking: &Booking,
    reason: &str,
    requested_at: DateTime<Utc>,
) -> serde_json::Value {
    json!({
        "bookingId": booking.id,
        "gameTimeSlotId": booking.game_time_slot_id,
        "playerCount": booking.player_count,
        "reason": reason,
        "requestedAt": requested_at,
    })
}
