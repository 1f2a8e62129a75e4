use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parkgolf_core::identity::IdentityHeaders;
use parkgolf_domain::pagination::PageRequest;

use crate::domain::types::{Booking, BookingHistory, ContactPatch};
use crate::error::BookingServiceError;
use crate::state::AppState;
use crate::usecase::cancel_booking::{CancelBookingInput, CancelBookingUseCase};
use crate::usecase::create_booking::{
    CreateBookingInput, CreateBookingOutcome, CreateBookingUseCase,
};
use crate::usecase::get_booking::{
    GetBookingByNumberUseCase, GetBookingHistoryUseCase, GetBookingUseCase, ListMyBookingsUseCase,
};
use crate::usecase::update_booking::{UpdateBookingInput, UpdateBookingUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BookingResponse {
    pub id: i64,
    pub booking_number: String,
    pub user_id: Uuid,
    pub game_id: i64,
    pub game_time_slot_id: i64,
    pub game_name: String,
    pub game_code: String,
    pub club_name: String,
    pub slot_date: chrono::NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub player_count: i32,
    pub unit_price: i64,
    pub service_fee: i64,
    pub total_price: i64,
    pub status: &'static str,
    pub saga_fail_reason: Option<String>,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
    #[serde(serialize_with = "parkgolf_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "parkgolf_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            booking_number: booking.booking_number,
            user_id: booking.user_id,
            game_id: booking.game_id,
            game_time_slot_id: booking.game_time_slot_id,
            game_name: booking.game_name,
            game_code: booking.game_code,
            club_name: booking.club_name,
            slot_date: booking.slot_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            player_count: booking.player_count,
            unit_price: booking.unit_price,
            service_fee: booking.service_fee,
            total_price: booking.total_price,
            status: booking.status.as_str(),
            saga_fail_reason: booking.saga_fail_reason,
            user_email: booking.user_email,
            user_name: booking.user_name,
            user_phone: booking.user_phone,
            special_requests: booking.special_requests,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub id: i64,
    pub action: String,
    pub details: serde_json::Value,
    pub user_id: Uuid,
    #[serde(serialize_with = "parkgolf_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<BookingHistory> for HistoryResponse {
    fn from(history: BookingHistory) -> Self {
        Self {
            id: history.id,
            action: history.action,
            details: history.details,
            user_id: history.user_id,
            created_at: history.created_at,
        }
    }
}

// ── POST /bookings ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub game_time_slot_id: i64,
    pub player_count: i32,
    pub idempotency_key: String,
    pub user_email: String,
    pub user_name: String,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
}

pub async fn create_booking(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), BookingServiceError> {
    let usecase = CreateBookingUseCase {
        bookings: state.booking_repo(),
        cache: state.slot_cache_repo(),
        catalog: state.slot_catalog(),
    };
    let outcome = usecase
        .execute(CreateBookingInput {
            user_id: identity.user_id,
            game_time_slot_id: body.game_time_slot_id,
            player_count: body.player_count,
            idempotency_key: body.idempotency_key,
            user_email: body.user_email,
            user_name: body.user_name,
            user_phone: body.user_phone,
            special_requests: body.special_requests,
        })
        .await?;

    // A repeated key maps to 202 while the original request is still being
    // resolved, 200 once it has a terminal or confirmed outcome.
    let (status, booking) = match outcome {
        CreateBookingOutcome::Created(b) => (StatusCode::CREATED, b),
        CreateBookingOutcome::AlreadyProcessing(b) => (StatusCode::ACCEPTED, b),
        CreateBookingOutcome::Duplicate(b) => (StatusCode::OK, b),
    };
    Ok((status, Json(booking.into())))
}

// ── GET /bookings/@me ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct BookingListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_my_bookings(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<BookingResponse>>, BookingServiceError> {
    let query: BookingListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| BookingServiceError::MissingData)?
        .unwrap_or_default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    }
    .clamped();

    let usecase = ListMyBookingsUseCase {
        bookings: state.booking_repo(),
    };
    let bookings = usecase.execute(identity.user_id, page).await?;
    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

// ── GET /bookings/{id} ───────────────────────────────────────────────────────

pub async fn get_booking(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<BookingResponse>, BookingServiceError> {
    let usecase = GetBookingUseCase {
        bookings: state.booking_repo(),
    };
    let booking = usecase
        .execute(booking_id, identity.user_id, identity.user_role)
        .await?;
    Ok(Json(booking.into()))
}

// ── GET /bookings/number/{booking_number} ────────────────────────────────────

pub async fn get_booking_by_number(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(booking_number): Path<String>,
) -> Result<Json<BookingResponse>, BookingServiceError> {
    let usecase = GetBookingByNumberUseCase {
        bookings: state.booking_repo(),
    };
    let booking = usecase
        .execute(&booking_number, identity.user_id, identity.user_role)
        .await?;
    Ok(Json(booking.into()))
}

// ── GET /bookings/{id}/history ───────────────────────────────────────────────

pub async fn get_booking_history(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<Vec<HistoryResponse>>, BookingServiceError> {
    let usecase = GetBookingHistoryUseCase {
        bookings: state.booking_repo(),
    };
    let history = usecase
        .execute(booking_id, identity.user_id, identity.user_role)
        .await?;
    Ok(Json(history.into_iter().map(Into::into).collect()))
}

// ── PATCH /bookings/{id} ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub user_phone: Option<String>,
    pub special_requests: Option<String>,
}

pub async fn update_booking(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(body): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, BookingServiceError> {
    let usecase = UpdateBookingUseCase {
        bookings: state.booking_repo(),
    };
    let booking = usecase
        .execute(UpdateBookingInput {
            booking_id,
            user_id: identity.user_id,
            user_role: identity.user_role,
            patch: ContactPatch {
                user_email: body.user_email,
                user_name: body.user_name,
                user_phone: body.user_phone,
                special_requests: body.special_requests,
            },
        })
        .await?;
    Ok(Json(booking.into()))
}

// ── POST /bookings/{id}/cancel ───────────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct CancelBookingRequest {
    pub reason: Option<String>,
}

pub async fn cancel_booking(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    body: Option<Json<CancelBookingRequest>>,
) -> Result<Json<BookingResponse>, BookingServiceError> {
    let reason = body.and_then(|Json(b)| b.reason);
    let usecase = CancelBookingUseCase {
        bookings: state.booking_repo(),
        bus: state.bus(),
    };
    let booking = usecase
        .execute(CancelBookingInput {
            booking_id,
            user_id: identity.user_id,
            user_role: identity.user_role,
            reason,
        })
        .await?;
    Ok(Json(booking.into()))
}
