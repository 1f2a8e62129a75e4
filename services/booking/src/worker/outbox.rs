use std::time::Duration;

use chrono::Utc;

use crate::domain::repository::{MessageBus, OutboxRepository};
use crate::domain::types::{
    OUTBOX_BATCH_SIZE, OUTBOX_CLEANUP_INTERVAL_SECS, OUTBOX_MAX_RETRIES, OUTBOX_POLL_INTERVAL_MS,
    OUTBOX_RETENTION_DAYS, OutboxEvent, is_request_reply,
};
use crate::error::BookingServiceError;

/// Outbox dispatch loop. Spawned from `main`; never returns. Errors are
/// logged and the next cycle proceeds — a worker must not take the service
/// down.
pub async fn run_dispatcher<O, M>(outbox: O, bus: M)
where
    O: OutboxRepository,
    M: MessageBus,
{
    tracing::info!("outbox dispatcher started");
    let mut poll = tokio::time::interval(Duration::from_millis(OUTBOX_POLL_INTERVAL_MS));
    loop {
        poll.tick().await;
        match dispatch_batch(&outbox, &bus).await {
            Ok(0) => {}
            Ok(count) => tracing::debug!(count, "dispatched outbox events"),
            Err(e) => tracing::error!(error = %e, "outbox dispatch cycle failed"),
        }
    }
}

/// One dispatcher cycle: claim a batch exclusively (skip-locked), then send
/// each event and record the outcome. Public so tests can drive single
/// cycles against mock ports.
pub async fn dispatch_batch<O, M>(outbox: &O, bus: &M) -> Result<usize, BookingServiceError>
where
    O: OutboxRepository,
    M: MessageBus,
{
    let events = outbox
        .claim_pending(OUTBOX_BATCH_SIZE, OUTBOX_MAX_RETRIES)
        .await?;
    for event in &events {
        dispatch_one(outbox, bus, event).await?;
    }
    Ok(events.len())
}

async fn dispatch_one<O, M>(
    outbox: &O,
    bus: &M,
    event: &OutboxEvent,
) -> Result<(), BookingServiceError>
where
    O: OutboxRepository,
    M: MessageBus,
{
    let sent = if is_request_reply(&event.event_type) {
        match bus.request(&event.event_type, &event.payload).await {
            Ok(ack) if ack.success => Ok(()),
            Ok(ack) => Err(ack
                .error
                .unwrap_or_else(|| "rejected without reason".to_owned())),
            Err(e) => Err(e.to_string()),
        }
    } else {
        bus.publish(&event.event_type, &event.payload)
            .await
            .map_err(|e| e.to_string())
    };

    match sent {
        Ok(()) => {
            outbox.mark_sent(event.id).await?;
            tracing::info!(
                event_id = %event.id,
                event_type = %event.event_type,
                "outbox event sent"
            );
        }
        Err(error) => {
            let attempts = event.retry_count + 1;
            let permanent = attempts >= OUTBOX_MAX_RETRIES;
            outbox
                .record_failure(event.id, attempts, &error, permanent)
                .await?;
            if permanent {
                tracing::error!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    attempts,
                    error = %error,
                    "outbox event failed permanently"
                );
            } else {
                tracing::warn!(
                    event_id = %event.id,
                    event_type = %event.event_type,
                    attempt = attempts,
                    max = OUTBOX_MAX_RETRIES,
                    error = %error,
                    "outbox event dispatch failed, will retry"
                );
            }
        }
    }
    Ok(())
}

/// Hourly purge of SENT events past the retention window, bounding outbox
/// table growth.
pub async fn run_cleanup<O: OutboxRepository>(outbox: O) {
    let mut tick = tokio::time::interval(Duration::from_secs(OUTBOX_CLEANUP_INTERVAL_SECS));
    loop {
        tick.tick().await;
        let cutoff = Utc::now() - chrono::Duration::days(OUTBOX_RETENTION_DAYS);
        match outbox.purge_sent_before(cutoff).await {
            Ok(0) => {}
            Ok(count) => tracing::info!(count, "purged sent outbox events"),
            Err(e) => tracing::error!(error = %e, "outbox cleanup failed"),
        }
    }
}
