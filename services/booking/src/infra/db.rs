use anyhow::Context as _;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};
use serde_json::json;
use uuid::Uuid;

use parkgolf_booking_schema::{
    booking_histories, bookings, game_cache, game_time_slot_cache, idempotency_keys, outbox_events,
};
use parkgolf_domain::pagination::PageRequest;

use crate::domain::repository::{BookingRepository, OutboxRepository, SlotCacheRepository};
use crate::domain::types::{
    Booking, BookingHistory, BookingStatus, ContactPatch, GameSnapshot, GameTimeSlot,
    HistoryAction, IDEMPOTENCY_KEY_TTL_HOURS, NewBooking, OutboxEvent, OutboxStatus,
    TOPIC_SLOT_RELEASE, TOPIC_SLOT_RESERVE, release_event_payload, reserve_event_payload,
};
use crate::error::BookingServiceError;

/// Aggregate type stamped on every outbox event this service writes.
const AGGREGATE_TYPE: &str = "booking";

// ── Booking repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBookingRepository {
    pub db: DatabaseConnection,
}

impl BookingRepository for DbBookingRepository {
    async fn create_pending(&self, booking: &NewBooking) -> Result<Booking, BookingServiceError> {
        let model = self
            .db
            .transaction::<_, bookings::Model, sea_orm::DbErr>(|txn| {
                let booking = booking.clone();
                Box::pin(async move {
                    let now = Utc::now();
                    let model = bookings::ActiveModel {
                        booking_number: Set(booking.booking_number.clone()),
                        user_id: Set(booking.user_id),
                        game_id: Set(booking.game_id),
                        game_time_slot_id: Set(booking.game_time_slot_id),
                        game_name: Set(booking.game_name.clone()),
                        game_code: Set(booking.game_code.clone()),
                        club_name: Set(booking.club_name.clone()),
                        slot_date: Set(booking.slot_date),
                        start_time: Set(booking.start_time.clone()),
                        end_time: Set(booking.end_time.clone()),
                        player_count: Set(booking.player_count),
                        unit_price: Set(booking.unit_price),
                        service_fee: Set(booking.service_fee),
                        total_price: Set(booking.total_price),
                        status: Set(BookingStatus::Pending.as_str().to_owned()),
                        idempotency_key: Set(booking.idempotency_key.clone()),
                        saga_fail_reason: Set(None),
                        user_email: Set(booking.user_email.clone()),
                        user_name: Set(booking.user_name.clone()),
                        user_phone: Set(booking.user_phone.clone()),
                        special_requests: Set(booking.special_requests.clone()),
                        created_at: Set(now),
                        updated_at: Set(now),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await?;

                    insert_history(
                        txn,
                        model.id,
                        HistoryAction::SagaStarted,
                        json!({
                            "bookingNumber": model.booking_number,
                            "gameTimeSlotId": model.game_time_slot_id,
                            "playerCount": model.player_count,
                        }),
                        model.user_id,
                    )
                    .await?;

                    insert_outbox(
                        txn,
                        model.id,
                        TOPIC_SLOT_RESERVE,
                        reserve_event_payload(
                            model.id,
                            &model.booking_number,
                            model.game_time_slot_id,
                            model.player_count,
                            now,
                        ),
                    )
                    .await?;

                    // An expired row for the same key is overwritten; a live one
                    // hits the idempotency guard before this transaction runs.
                    idempotency_keys::Entity::insert(idempotency_keys::ActiveModel {
                        key: Set(booking.idempotency_key.clone()),
                        booking_id: Set(model.id),
                        expires_at: Set(now + chrono::Duration::hours(IDEMPOTENCY_KEY_TTL_HOURS)),
                        created_at: Set(now),
                    })
                    .on_conflict(
                        OnConflict::column(idempotency_keys::Column::Key)
                            .update_columns([
                                idempotency_keys::Column::BookingId,
                                idempotency_keys::Column::ExpiresAt,
                                idempotency_keys::Column::CreatedAt,
                            ])
                            .to_owned(),
                    )
                    .exec(txn)
                    .await?;

                    Ok(model)
                })
            })
            .await
            .context("create pending booking with outbox")?;
        booking_from_model(model)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, BookingServiceError> {
        let model = bookings::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find booking by id")?;
        model.map(booking_from_model).transpose()
    }

    async fn find_by_number(
        &self,
        booking_number: &str,
    ) -> Result<Option<Booking>, BookingServiceError> {
        let model = bookings::Entity::find()
            .filter(bookings::Column::BookingNumber.eq(booking_number))
            .one(&self.db)
            .await
            .context("find booking by number")?;
        model.map(booking_from_model).transpose()
    }

    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<Booking>, BookingServiceError> {
        let now = Utc::now();
        let Some(key_row) = idempotency_keys::Entity::find_by_id(key.to_owned())
            .filter(idempotency_keys::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find idempotency key")?
        else {
            return Ok(None);
        };
        self.find_by_id(key_row.booking_id).await
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Booking>, BookingServiceError> {
        let PageRequest { per_page, page } = page.clamped();
        let models = bookings::Entity::find()
            .filter(bookings::Column::UserId.eq(user_id))
            .order_by_desc(bookings::Column::CreatedAt)
            .offset(((page - 1) * per_page) as u64)
            .limit(per_page as u64)
            .all(&self.db)
            .await
            .context("list bookings by user")?;
        models.into_iter().map(booking_from_model).collect()
    }

    async fn list_history(
        &self,
        booking_id: i64,
    ) -> Result<Vec<BookingHistory>, BookingServiceError> {
        let models = booking_histories::Entity::find()
            .filter(booking_histories::Column::BookingId.eq(booking_id))
            .order_by_asc(booking_histories::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list booking history")?;
        Ok(models.into_iter().map(history_from_model).collect())
    }

    async fn update_contact(
        &self,
        booking: &Booking,
        patch: &ContactPatch,
        actor: Uuid,
    ) -> Result<(), BookingServiceError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let booking_id = booking.id;
                let patch = patch.clone();
                Box::pin(async move {
                    let mut am = bookings::ActiveModel {
                        id: Set(booking_id),
                        ..Default::default()
                    };
                    let mut changed = serde_json::Map::new();
                    if let Some(email) = &patch.user_email {
                        am.user_email = Set(email.clone());
                        changed.insert("userEmail".to_owned(), json!(email));
                    }
                    if let Some(name) = &patch.user_name {
                        am.user_name = Set(name.clone());
                        changed.insert("userName".to_owned(), json!(name));
                    }
                    if let Some(phone) = &patch.user_phone {
                        am.user_phone = Set(Some(phone.clone()));
                        changed.insert("userPhone".to_owned(), json!(phone));
                    }
                    if let Some(requests) = &patch.special_requests {
                        am.special_requests = Set(Some(requests.clone()));
                        changed.insert("specialRequests".to_owned(), json!(requests));
                    }
                    am.updated_at = Set(Utc::now());
                    am.update(txn).await?;

                    insert_history(
                        txn,
                        booking_id,
                        HistoryAction::Updated,
                        serde_json::Value::Object(changed),
                        actor,
                    )
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("update booking contact")?;
        Ok(())
    }

    async fn confirm(
        &self,
        booking: &Booking,
        reserved_at: &str,
    ) -> Result<bool, BookingServiceError> {
        let applied = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let booking = booking.clone();
                let reserved_at = reserved_at.to_owned();
                Box::pin(async move {
                    let updated = bookings::Entity::update_many()
                        .col_expr(
                            bookings::Column::Status,
                            Expr::value(BookingStatus::Confirmed.as_str()),
                        )
                        .col_expr(bookings::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(bookings::Column::Id.eq(booking.id))
                        .filter(bookings::Column::Status.eq(BookingStatus::Pending.as_str()))
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Ok(false);
                    }

                    insert_history(
                        txn,
                        booking.id,
                        HistoryAction::SlotReserved,
                        json!({ "reservedAt": reserved_at }),
                        booking.user_id,
                    )
                    .await?;
                    insert_history(
                        txn,
                        booking.id,
                        HistoryAction::Confirmed,
                        json!({ "totalPrice": booking.total_price }),
                        booking.user_id,
                    )
                    .await?;

                    adjust_slot_counters(txn, booking.game_time_slot_id, booking.player_count)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("confirm booking")?;
        Ok(applied)
    }

    async fn fail(
        &self,
        booking: &Booking,
        reason: &str,
        action: HistoryAction,
    ) -> Result<bool, BookingServiceError> {
        let applied = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let booking_id = booking.id;
                let user_id = booking.user_id;
                let reason = reason.to_owned();
                Box::pin(async move {
                    let updated = bookings::Entity::update_many()
                        .col_expr(
                            bookings::Column::Status,
                            Expr::value(BookingStatus::Failed.as_str()),
                        )
                        .col_expr(
                            bookings::Column::SagaFailReason,
                            Expr::value(Some(reason.clone())),
                        )
                        .col_expr(bookings::Column::UpdatedAt, Expr::value(Utc::now()))
                        .filter(bookings::Column::Id.eq(booking_id))
                        .filter(bookings::Column::Status.eq(BookingStatus::Pending.as_str()))
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Ok(false);
                    }

                    insert_history(txn, booking_id, action, json!({ "reason": reason }), user_id)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("fail booking")?;
        Ok(applied)
    }

    async fn cancel(
        &self,
        booking: &Booking,
        actor: Uuid,
        reason: Option<&str>,
    ) -> Result<bool, BookingServiceError> {
        let applied = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                let booking = booking.clone();
                let reason = reason.unwrap_or("cancelled by user").to_owned();
                Box::pin(async move {
                    let now = Utc::now();
                    let updated = bookings::Entity::update_many()
                        .col_expr(
                            bookings::Column::Status,
                            Expr::value(BookingStatus::Cancelled.as_str()),
                        )
                        .col_expr(bookings::Column::UpdatedAt, Expr::value(now))
                        .filter(bookings::Column::Id.eq(booking.id))
                        .filter(bookings::Column::Status.eq(BookingStatus::Confirmed.as_str()))
                        .exec(txn)
                        .await?;
                    if updated.rows_affected == 0 {
                        return Ok(false);
                    }

                    insert_history(
                        txn,
                        booking.id,
                        HistoryAction::Cancelled,
                        json!({ "reason": reason, "cancelledBy": actor }),
                        actor,
                    )
                    .await?;

                    restore_slot_counters(txn, booking.game_time_slot_id, booking.player_count)
                        .await?;

                    insert_outbox(
                        txn,
                        booking.id,
                        TOPIC_SLOT_RELEASE,
                        release_event_payload(&booking, &reason, now),
                    )
                    .await?;
                    Ok(true)
                })
            })
            .await
            .context("cancel booking")?;
        Ok(applied)
    }

    async fn list_timed_out(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Booking>, BookingServiceError> {
        let models = bookings::Entity::find()
            .filter(bookings::Column::Status.eq(BookingStatus::Pending.as_str()))
            .filter(bookings::Column::CreatedAt.lt(cutoff))
            .all(&self.db)
            .await
            .context("list timed-out bookings")?;
        models.into_iter().map(booking_from_model).collect()
    }
}

async fn insert_history(
    txn: &DatabaseTransaction,
    booking_id: i64,
    action: HistoryAction,
    details: serde_json::Value,
    user_id: Uuid,
) -> Result<(), sea_orm::DbErr> {
    booking_histories::ActiveModel {
        booking_id: Set(booking_id),
        action: Set(action.as_str().to_owned()),
        details: Set(details),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_outbox(
    txn: &DatabaseTransaction,
    aggregate_id: i64,
    event_type: &str,
    payload: serde_json::Value,
) -> Result<(), sea_orm::DbErr> {
    outbox_events::ActiveModel {
        id: Set(Uuid::new_v4()),
        aggregate_type: Set(AGGREGATE_TYPE.to_owned()),
        aggregate_id: Set(aggregate_id),
        event_type: Set(event_type.to_owned()),
        payload: Set(payload),
        status: Set(OutboxStatus::Pending.as_str().to_owned()),
        retry_count: Set(0),
        last_error: Set(None),
        created_at: Set(Utc::now()),
        processed_at: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

/// Confirm path: take `player_count` seats in the local mirror, flagging the
/// slot unavailable once nothing remains.
async fn adjust_slot_counters(
    txn: &DatabaseTransaction,
    game_time_slot_id: i64,
    player_count: i32,
) -> Result<(), sea_orm::DbErr> {
    game_time_slot_cache::Entity::update_many()
        .col_expr(
            game_time_slot_cache::Column::BookedPlayers,
            Expr::col(game_time_slot_cache::Column::BookedPlayers).add(player_count),
        )
        .col_expr(
            game_time_slot_cache::Column::AvailablePlayers,
            Expr::col(game_time_slot_cache::Column::AvailablePlayers).sub(player_count),
        )
        .col_expr(game_time_slot_cache::Column::SyncedAt, Expr::value(Utc::now()))
        .filter(game_time_slot_cache::Column::GameTimeSlotId.eq(game_time_slot_id))
        .exec(txn)
        .await?;

    game_time_slot_cache::Entity::update_many()
        .col_expr(game_time_slot_cache::Column::IsAvailable, Expr::value(false))
        .filter(game_time_slot_cache::Column::GameTimeSlotId.eq(game_time_slot_id))
        .filter(game_time_slot_cache::Column::AvailablePlayers.lte(0))
        .exec(txn)
        .await?;
    Ok(())
}

/// Cancel path: give the seats back and reopen the slot in the local mirror.
async fn restore_slot_counters(
    txn: &DatabaseTransaction,
    game_time_slot_id: i64,
    player_count: i32,
) -> Result<(), sea_orm::DbErr> {
    game_time_slot_cache::Entity::update_many()
        .col_expr(
            game_time_slot_cache::Column::BookedPlayers,
            Expr::col(game_time_slot_cache::Column::BookedPlayers).sub(player_count),
        )
        .col_expr(
            game_time_slot_cache::Column::AvailablePlayers,
            Expr::col(game_time_slot_cache::Column::AvailablePlayers).add(player_count),
        )
        .col_expr(game_time_slot_cache::Column::IsAvailable, Expr::value(true))
        .col_expr(game_time_slot_cache::Column::SyncedAt, Expr::value(Utc::now()))
        .filter(game_time_slot_cache::Column::GameTimeSlotId.eq(game_time_slot_id))
        .exec(txn)
        .await?;
    Ok(())
}

fn booking_from_model(model: bookings::Model) -> Result<Booking, BookingServiceError> {
    let status = BookingStatus::parse(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown booking status: {}", model.status))?;
    Ok(Booking {
        id: model.id,
        booking_number: model.booking_number,
        user_id: model.user_id,
        game_id: model.game_id,
        game_time_slot_id: model.game_time_slot_id,
        game_name: model.game_name,
        game_code: model.game_code,
        club_name: model.club_name,
        slot_date: model.slot_date,
        start_time: model.start_time,
        end_time: model.end_time,
        player_count: model.player_count,
        unit_price: model.unit_price,
        service_fee: model.service_fee,
        total_price: model.total_price,
        status,
        idempotency_key: model.idempotency_key,
        saga_fail_reason: model.saga_fail_reason,
        user_email: model.user_email,
        user_name: model.user_name,
        user_phone: model.user_phone,
        special_requests: model.special_requests,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn history_from_model(model: booking_histories::Model) -> BookingHistory {
    BookingHistory {
        id: model.id,
        booking_id: model.booking_id,
        action: model.action,
        details: model.details,
        user_id: model.user_id,
        created_at: model.created_at,
    }
}

// ── Outbox repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOutboxRepository {
    pub db: DatabaseConnection,
}

impl OutboxRepository for DbOutboxRepository {
    async fn claim_pending(
        &self,
        batch_size: u64,
        max_retries: i32,
    ) -> Result<Vec<OutboxEvent>, BookingServiceError> {
        use sea_orm::{ConnectionTrait, FromQueryResult, Statement};

        let models = self
            .db
            .transaction::<_, Vec<outbox_events::Model>, sea_orm::DbErr>(move |txn| {
                Box::pin(async move {
                    // Skip-locked read: rows claimed by a concurrent dispatcher
                    // instance are invisible here, so an event is processed by
                    // at most one instance per cycle.
                    let stmt = Statement::from_sql_and_values(
                        txn.get_database_backend(),
                        r#"
                        SELECT * FROM outbox_events
                            WHERE status = $1 AND retry_count < $2
                            ORDER BY created_at ASC
                            LIMIT $3
                            FOR UPDATE SKIP LOCKED
                        "#,
                        [
                            OutboxStatus::Pending.as_str().into(),
                            max_retries.into(),
                            (batch_size as i64).into(),
                        ],
                    );
                    let models = outbox_events::Model::find_by_statement(stmt).all(txn).await?;
                    if models.is_empty() {
                        return Ok(models);
                    }

                    let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
                    outbox_events::Entity::update_many()
                        .col_expr(
                            outbox_events::Column::Status,
                            Expr::value(OutboxStatus::Processing.as_str()),
                        )
                        .filter(outbox_events::Column::Id.is_in(ids))
                        .exec(txn)
                        .await?;
                    Ok(models)
                })
            })
            .await
            .context("claim pending outbox events")?;

        models
            .into_iter()
            .map(|mut model| {
                model.status = OutboxStatus::Processing.as_str().to_owned();
                outbox_from_model(model)
            })
            .collect()
    }

    async fn mark_sent(&self, event_id: Uuid) -> Result<(), BookingServiceError> {
        outbox_events::Entity::update_many()
            .col_expr(
                outbox_events::Column::Status,
                Expr::value(OutboxStatus::Sent.as_str()),
            )
            .col_expr(outbox_events::Column::ProcessedAt, Expr::value(Some(Utc::now())))
            .filter(outbox_events::Column::Id.eq(event_id))
            .exec(&self.db)
            .await
            .context("mark outbox event sent")?;
        Ok(())
    }

    async fn record_failure(
        &self,
        event_id: Uuid,
        retry_count: i32,
        error: &str,
        permanent: bool,
    ) -> Result<(), BookingServiceError> {
        let status = if permanent {
            OutboxStatus::Failed
        } else {
            OutboxStatus::Pending
        };
        outbox_events::Entity::update_many()
            .col_expr(outbox_events::Column::Status, Expr::value(status.as_str()))
            .col_expr(outbox_events::Column::RetryCount, Expr::value(retry_count))
            .col_expr(
                outbox_events::Column::LastError,
                Expr::value(Some(error.to_owned())),
            )
            .filter(outbox_events::Column::Id.eq(event_id))
            .exec(&self.db)
            .await
            .context("record outbox dispatch failure")?;
        Ok(())
    }

    async fn purge_sent_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<u64, BookingServiceError> {
        let result = outbox_events::Entity::delete_many()
            .filter(outbox_events::Column::Status.eq(OutboxStatus::Sent.as_str()))
            .filter(outbox_events::Column::ProcessedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .context("purge sent outbox events")?;
        Ok(result.rows_affected)
    }
}

fn outbox_from_model(model: outbox_events::Model) -> Result<OutboxEvent, BookingServiceError> {
    let status = OutboxStatus::parse(&model.status)
        .ok_or_else(|| anyhow::anyhow!("unknown outbox status: {}", model.status))?;
    Ok(OutboxEvent {
        id: model.id,
        aggregate_type: model.aggregate_type,
        aggregate_id: model.aggregate_id,
        event_type: model.event_type,
        payload: model.payload,
        status,
        retry_count: model.retry_count,
        last_error: model.last_error,
        created_at: model.created_at,
        processed_at: model.processed_at,
    })
}

// ── Slot cache repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSlotCacheRepository {
    pub db: DatabaseConnection,
}

impl SlotCacheRepository for DbSlotCacheRepository {
    async fn find_game(&self, game_id: i64) -> Result<Option<GameSnapshot>, BookingServiceError> {
        let model = game_cache::Entity::find_by_id(game_id)
            .one(&self.db)
            .await
            .context("find cached game")?;
        Ok(model.map(game_from_model))
    }

    async fn find_slot(
        &self,
        game_time_slot_id: i64,
    ) -> Result<Option<GameTimeSlot>, BookingServiceError> {
        let model = game_time_slot_cache::Entity::find_by_id(game_time_slot_id)
            .one(&self.db)
            .await
            .context("find cached time slot")?;
        Ok(model.map(slot_from_model))
    }

    async fn list_slots(
        &self,
        game_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<GameTimeSlot>, BookingServiceError> {
        let models = game_time_slot_cache::Entity::find()
            .filter(game_time_slot_cache::Column::GameId.eq(game_id))
            .filter(game_time_slot_cache::Column::SlotDate.eq(date))
            .order_by_asc(game_time_slot_cache::Column::StartTime)
            .all(&self.db)
            .await
            .context("list cached time slots")?;
        Ok(models.into_iter().map(slot_from_model).collect())
    }

    async fn upsert_game(&self, game: &GameSnapshot) -> Result<(), BookingServiceError> {
        game_cache::Entity::insert(game_cache::ActiveModel {
            game_id: Set(game.game_id),
            name: Set(game.name.clone()),
            code: Set(game.code.clone()),
            club_name: Set(game.club_name.clone()),
            location: Set(game.location.clone()),
            base_price: Set(game.base_price),
            max_players: Set(game.max_players),
            is_active: Set(game.is_active),
            synced_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(game_cache::Column::GameId)
                .update_columns([
                    game_cache::Column::Name,
                    game_cache::Column::Code,
                    game_cache::Column::ClubName,
                    game_cache::Column::Location,
                    game_cache::Column::BasePrice,
                    game_cache::Column::MaxPlayers,
                    game_cache::Column::IsActive,
                    game_cache::Column::SyncedAt,
                ])
                .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert cached game")?;
        Ok(())
    }

    async fn upsert_slot(&self, slot: &GameTimeSlot) -> Result<(), BookingServiceError> {
        game_time_slot_cache::Entity::insert(game_time_slot_cache::ActiveModel {
            game_time_slot_id: Set(slot.game_time_slot_id),
            game_id: Set(slot.game_id),
            slot_date: Set(slot.slot_date),
            start_time: Set(slot.start_time.clone()),
            end_time: Set(slot.end_time.clone()),
            max_players: Set(slot.max_players),
            booked_players: Set(slot.booked_players),
            available_players: Set(slot.available_players),
            unit_price: Set(slot.unit_price),
            is_available: Set(slot.is_available),
            status: Set(slot.status.clone()),
            synced_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::column(game_time_slot_cache::Column::GameTimeSlotId)
                .update_columns([
                    game_time_slot_cache::Column::GameId,
                    game_time_slot_cache::Column::SlotDate,
                    game_time_slot_cache::Column::StartTime,
                    game_time_slot_cache::Column::EndTime,
                    game_time_slot_cache::Column::MaxPlayers,
                    game_time_slot_cache::Column::BookedPlayers,
                    game_time_slot_cache::Column::AvailablePlayers,
                    game_time_slot_cache::Column::UnitPrice,
                    game_time_slot_cache::Column::IsAvailable,
                    game_time_slot_cache::Column::Status,
                    game_time_slot_cache::Column::SyncedAt,
                ])
                .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert cached time slot")?;
        Ok(())
    }
}

fn game_from_model(model: game_cache::Model) -> GameSnapshot {
    GameSnapshot {
        game_id: model.game_id,
        name: model.name,
        code: model.code,
        club_name: model.club_name,
        location: model.location,
        base_price: model.base_price,
        max_players: model.max_players,
        is_active: model.is_active,
    }
}

fn slot_from_model(model: game_time_slot_cache::Model) -> GameTimeSlot {
    GameTimeSlot {
        game_time_slot_id: model.game_time_slot_id,
        game_id: model.game_id,
        slot_date: model.slot_date,
        start_time: model.start_time,
        end_time: model.end_time,
        max_players: model.max_players,
        booked_players: model.booked_players,
        available_players: model.available_players,
        unit_price: model.unit_price,
        is_available: model.is_available,
        status: model.status,
    }
}
