use chrono::{Duration, Utc};

use parkgolf_booking::domain::repository::BookingRepository;
use parkgolf_booking::domain::types::{
    BookingStatus, TOPIC_BOOKING_CANCELLED, TOPIC_SLOT_RELEASE,
};
use parkgolf_booking::error::BookingServiceError;
use parkgolf_booking::usecase::cancel_booking::{CancelBookingInput, CancelBookingUseCase};

use crate::helpers::{
    MockBookingRepo, MockBus, TEST_SLOT_ID, TestStore, create_test_booking, other_user_id,
    seeded_store, test_game, test_slot_on, test_user_id,
};

fn cancel_usecase(
    store: &TestStore,
    bus: &MockBus,
) -> CancelBookingUseCase<MockBookingRepo, MockBus> {
    CancelBookingUseCase {
        bookings: MockBookingRepo {
            store: store.clone(),
        },
        bus: bus.clone(),
    }
}

fn cancel_input(booking_id: i64) -> CancelBookingInput {
    CancelBookingInput {
        booking_id,
        user_id: test_user_id(),
        user_role: 0,
        reason: Some("change of plans".to_owned()),
    }
}

/// Create a CONFIRMED booking on a slot the given number of days out.
async fn confirmed_booking(store: &TestStore, days_out: i64, player_count: i32) -> i64 {
    store.seed_game(test_game());
    store.seed_slot(test_slot_on(
        Utc::now().date_naive() + Duration::days(days_out),
        4,
    ));
    let booking = create_test_booking(store, "key-cancel", player_count).await;
    let repo = MockBookingRepo {
        store: store.clone(),
    };
    assert!(repo.confirm(&booking, "2026-08-07T09:00:00Z").await.unwrap());
    booking.id
}

#[tokio::test]
async fn should_cancel_confirmed_booking_outside_the_window() {
    let store = TestStore::new();
    let bus = MockBus::new();
    let booking_id = confirmed_booking(&store, 5, 2).await;

    let cancelled = cancel_usecase(&store, &bus)
        .execute(cancel_input(booking_id))
        .await
        .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);

    // Compensation: mirror restored and one release request queued.
    let slot = store.slot(TEST_SLOT_ID);
    assert_eq!(slot.booked_players, 0);
    assert_eq!(slot.available_players, 4);
    assert!(slot.is_available);

    let releases: Vec<_> = store
        .outbox_events()
        .into_iter()
        .filter(|e| e.event_type == TOPIC_SLOT_RELEASE)
        .collect();
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].payload["playerCount"], 2);

    let actions: Vec<String> = store
        .histories_for(booking_id)
        .iter()
        .map(|h| h.action.clone())
        .collect();
    assert_eq!(
        actions,
        ["SAGA_STARTED", "SLOT_RESERVED", "CONFIRMED", "CANCELLED"]
    );

    let publishes = bus.publishes();
    assert_eq!(publishes.len(), 1);
    assert_eq!(publishes[0].0, TOPIC_BOOKING_CANCELLED);
}

#[tokio::test]
async fn should_allow_cancellation_exactly_at_the_window_boundary() {
    let store = TestStore::new();
    let bus = MockBus::new();
    let booking_id = confirmed_booking(&store, 3, 2).await;

    let cancelled = cancel_usecase(&store, &bus)
        .execute(cancel_input(booking_id))
        .await
        .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn should_reject_cancellation_inside_the_window() {
    let store = TestStore::new();
    let bus = MockBus::new();
    let booking_id = confirmed_booking(&store, 2, 2).await;

    let err = cancel_usecase(&store, &bus)
        .execute(cancel_input(booking_id))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingServiceError::CancellationWindowClosed));
    assert_eq!(store.booking(booking_id).status, BookingStatus::Confirmed);
    assert_eq!(store.slot(TEST_SLOT_ID).booked_players, 2);
}

#[tokio::test]
async fn should_reject_cancellation_by_a_stranger_but_allow_admin() {
    let store = TestStore::new();
    let bus = MockBus::new();
    let booking_id = confirmed_booking(&store, 5, 2).await;

    let mut input = cancel_input(booking_id);
    input.user_id = other_user_id();
    let err = cancel_usecase(&store, &bus)
        .execute(input)
        .await
        .unwrap_err();
    assert!(matches!(err, BookingServiceError::Forbidden));

    let mut input = cancel_input(booking_id);
    input.user_id = other_user_id();
    input.user_role = 2;
    let cancelled = cancel_usecase(&store, &bus).execute(input).await.unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn should_reject_cancelling_a_pending_booking() {
    let store = seeded_store(4);
    let bus = MockBus::new();
    let booking = create_test_booking(&store, "key-pending", 2).await;

    let err = cancel_usecase(&store, &bus)
        .execute(cancel_input(booking.id))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingServiceError::InvalidStatus));
}

#[tokio::test]
async fn should_reject_cancelling_twice() {
    let store = TestStore::new();
    let bus = MockBus::new();
    let booking_id = confirmed_booking(&store, 5, 2).await;

    cancel_usecase(&store, &bus)
        .execute(cancel_input(booking_id))
        .await
        .unwrap();
    let err = cancel_usecase(&store, &bus)
        .execute(cancel_input(booking_id))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingServiceError::AlreadyCancelled));
    // One compensation only.
    let releases = store
        .outbox_events()
        .into_iter()
        .filter(|e| e.event_type == TOPIC_SLOT_RELEASE)
        .count();
    assert_eq!(releases, 1);
}

#[tokio::test]
async fn should_reject_cancelling_an_unknown_booking() {
    let store = TestStore::new();
    let bus = MockBus::new();

    let err = cancel_usecase(&store, &bus)
        .execute(cancel_input(999))
        .await
        .unwrap_err();

    assert!(matches!(err, BookingServiceError::BookingNotFound));
}
