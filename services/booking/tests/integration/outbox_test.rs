use chrono::{Duration, Utc};
use serde_json::json;

use parkgolf_booking::domain::repository::OutboxRepository;
use parkgolf_booking::domain::types::{
    OUTBOX_BATCH_SIZE, OUTBOX_MAX_RETRIES, OutboxStatus, TOPIC_BOOKING_CONFIRMED,
    TOPIC_SLOT_RESERVE,
};
use parkgolf_booking::worker::outbox::dispatch_batch;

use crate::helpers::{MockBus, MockOutboxRepo, TestStore};

fn reserve_payload() -> serde_json::Value {
    json!({
        "bookingId": 1,
        "bookingNumber": "BK-TEST00000001",
        "gameTimeSlotId": 42,
        "playerCount": 2,
        "requestedAt": Utc::now(),
    })
}

#[tokio::test]
async fn should_send_request_reply_event_and_mark_sent() {
    let store = TestStore::new();
    let event_id = store.push_outbox_event(TOPIC_SLOT_RESERVE, reserve_payload(), 0);
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };
    let bus = MockBus::new();

    let dispatched = dispatch_batch(&outbox, &bus).await.unwrap();

    assert_eq!(dispatched, 1);
    let event = store.outbox_event(event_id);
    assert_eq!(event.status, OutboxStatus::Sent);
    assert!(event.processed_at.is_some());
    // reserve goes request/reply, not publish.
    assert_eq!(bus.requests().len(), 1);
    assert_eq!(bus.requests()[0].0, TOPIC_SLOT_RESERVE);
    assert_eq!(bus.publishes().len(), 0);
}

#[tokio::test]
async fn should_publish_notification_events_fire_and_forget() {
    let store = TestStore::new();
    let event_id = store.push_outbox_event(TOPIC_BOOKING_CONFIRMED, json!({"bookingId": 1}), 0);
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };
    let bus = MockBus::new();

    dispatch_batch(&outbox, &bus).await.unwrap();

    assert_eq!(store.outbox_event(event_id).status, OutboxStatus::Sent);
    assert_eq!(bus.requests().len(), 0);
    assert_eq!(bus.publishes().len(), 1);
}

#[tokio::test]
async fn should_return_failed_event_to_pending_for_retry() {
    let store = TestStore::new();
    let event_id = store.push_outbox_event(TOPIC_SLOT_RESERVE, reserve_payload(), 0);
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };
    let bus = MockBus::new();
    bus.fail_next_requests(1);

    dispatch_batch(&outbox, &bus).await.unwrap();

    let event = store.outbox_event(event_id);
    assert_eq!(event.status, OutboxStatus::Pending);
    assert_eq!(event.retry_count, 1);
    assert!(event.last_error.is_some());

    // Next cycle succeeds and completes the event.
    dispatch_batch(&outbox, &bus).await.unwrap();
    assert_eq!(store.outbox_event(event_id).status, OutboxStatus::Sent);
}

#[tokio::test]
async fn should_fail_permanently_at_the_retry_ceiling() {
    let store = TestStore::new();
    let event_id =
        store.push_outbox_event(TOPIC_SLOT_RESERVE, reserve_payload(), OUTBOX_MAX_RETRIES - 1);
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };
    let bus = MockBus::new();
    bus.fail_next_requests(1);

    dispatch_batch(&outbox, &bus).await.unwrap();

    let event = store.outbox_event(event_id);
    assert_eq!(event.status, OutboxStatus::Failed);
    assert_eq!(event.retry_count, OUTBOX_MAX_RETRIES);

    // A permanently failed event is no longer claimable.
    let dispatched = dispatch_batch(&outbox, &bus).await.unwrap();
    assert_eq!(dispatched, 0);
}

#[tokio::test]
async fn should_treat_negative_ack_as_dispatch_failure() {
    let store = TestStore::new();
    let event_id = store.push_outbox_event(TOPIC_SLOT_RESERVE, reserve_payload(), 0);
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };
    let bus = MockBus::new();
    bus.reject_requests();

    dispatch_batch(&outbox, &bus).await.unwrap();

    let event = store.outbox_event(event_id);
    assert_eq!(event.status, OutboxStatus::Pending);
    assert_eq!(event.last_error.as_deref(), Some("slot full"));
}

#[tokio::test]
async fn should_not_claim_events_already_processing() {
    let store = TestStore::new();
    store.push_outbox_event(TOPIC_SLOT_RESERVE, reserve_payload(), 0);
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };

    let claimed = outbox
        .claim_pending(OUTBOX_BATCH_SIZE, OUTBOX_MAX_RETRIES)
        .await
        .unwrap();
    assert_eq!(claimed.len(), 1);
    assert_eq!(claimed[0].status, OutboxStatus::Processing);

    // A second claimer (concurrent dispatcher instance) sees nothing.
    let claimed_again = outbox
        .claim_pending(OUTBOX_BATCH_SIZE, OUTBOX_MAX_RETRIES)
        .await
        .unwrap();
    assert!(claimed_again.is_empty());
}

#[tokio::test]
async fn should_claim_at_most_one_batch_per_cycle() {
    let store = TestStore::new();
    for _ in 0..(OUTBOX_BATCH_SIZE + 3) {
        store.push_outbox_event(TOPIC_BOOKING_CONFIRMED, json!({"bookingId": 1}), 0);
    }
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };
    let bus = MockBus::new();

    let dispatched = dispatch_batch(&outbox, &bus).await.unwrap();
    assert_eq!(dispatched as u64, OUTBOX_BATCH_SIZE);

    // The remainder is picked up next cycle.
    let dispatched = dispatch_batch(&outbox, &bus).await.unwrap();
    assert_eq!(dispatched, 3);
}

#[tokio::test]
async fn should_purge_only_sent_events_past_retention() {
    let store = TestStore::new();
    let sent = store.push_outbox_event(TOPIC_SLOT_RESERVE, reserve_payload(), 0);
    let pending = store.push_outbox_event(TOPIC_SLOT_RESERVE, reserve_payload(), 0);
    let outbox = MockOutboxRepo {
        store: store.clone(),
    };
    outbox.mark_sent(sent).await.unwrap();

    // A cutoff before the processed timestamp purges nothing.
    let purged = outbox
        .purge_sent_before(Utc::now() - Duration::days(7))
        .await
        .unwrap();
    assert_eq!(purged, 0);

    // A cutoff past it removes the SENT event but never the PENDING one.
    let purged = outbox
        .purge_sent_before(Utc::now() + Duration::seconds(1))
        .await
        .unwrap();
    assert_eq!(purged, 1);

    let remaining = store.outbox_events();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, pending);
}
