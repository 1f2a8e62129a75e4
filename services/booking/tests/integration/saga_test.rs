use parkgolf_booking::domain::types::{BookingStatus, TOPIC_BOOKING_CONFIRMED};
use parkgolf_booking::usecase::saga::{
    HandleSlotReserveFailedUseCase, HandleSlotReservedUseCase, SlotReserveFailedEvent,
    SlotReservedEvent,
};

use crate::helpers::{
    MockBookingRepo, MockBus, TEST_SLOT_ID, TestStore, create_test_booking, seeded_store,
};

fn reserved_event(booking_id: i64, player_count: i32) -> SlotReservedEvent {
    SlotReservedEvent {
        booking_id,
        game_time_slot_id: TEST_SLOT_ID,
        player_count,
        reserved_at: "2026-08-07T09:00:00Z".to_owned(),
    }
}

fn confirm_usecase(
    store: &TestStore,
    bus: &MockBus,
) -> HandleSlotReservedUseCase<MockBookingRepo, MockBus> {
    HandleSlotReservedUseCase {
        bookings: MockBookingRepo {
            store: store.clone(),
        },
        bus: bus.clone(),
    }
}

#[tokio::test]
async fn should_confirm_pending_booking_on_slot_reserved() {
    let store = seeded_store(4);
    let bus = MockBus::new();
    let booking = create_test_booking(&store, "key-confirm", 2).await;

    confirm_usecase(&store, &bus)
        .execute(reserved_event(booking.id, 2))
        .await
        .unwrap();

    assert_eq!(store.booking(booking.id).status, BookingStatus::Confirmed);

    let actions: Vec<String> = store
        .histories_for(booking.id)
        .iter()
        .map(|h| h.action.clone())
        .collect();
    assert_eq!(actions, ["SAGA_STARTED", "SLOT_RESERVED", "CONFIRMED"]);

    // Local mirror took the seats.
    let slot = store.slot(TEST_SLOT_ID);
    assert_eq!(slot.booked_players, 2);
    assert_eq!(slot.available_players, 2);

    // Best-effort notification went out after the transition.
    let publishes = bus.publishes();
    assert_eq!(publishes.len(), 1);
    assert_eq!(publishes[0].0, TOPIC_BOOKING_CONFIRMED);
    assert_eq!(publishes[0].1["bookingId"], booking.id);
}

#[tokio::test]
async fn should_absorb_duplicate_slot_reserved_delivery() {
    let store = seeded_store(4);
    let bus = MockBus::new();
    let booking = create_test_booking(&store, "key-dup-cb", 2).await;

    confirm_usecase(&store, &bus)
        .execute(reserved_event(booking.id, 2))
        .await
        .unwrap();
    confirm_usecase(&store, &bus)
        .execute(reserved_event(booking.id, 2))
        .await
        .unwrap();

    // Exactly one transition: one history pair, counters adjusted once, one
    // notification.
    assert_eq!(store.booking(booking.id).status, BookingStatus::Confirmed);
    assert_eq!(store.histories_for(booking.id).len(), 3);
    assert_eq!(store.slot(TEST_SLOT_ID).booked_players, 2);
    assert_eq!(bus.publishes().len(), 1);
}

#[tokio::test]
async fn should_fail_pending_booking_on_reserve_rejection() {
    let store = seeded_store(4);
    let booking = create_test_booking(&store, "key-reject", 2).await;

    let uc = HandleSlotReserveFailedUseCase {
        bookings: MockBookingRepo {
            store: store.clone(),
        },
    };
    uc.execute(SlotReserveFailedEvent {
        booking_id: booking.id,
        game_time_slot_id: TEST_SLOT_ID,
        reason: "slot already taken".to_owned(),
    })
    .await
    .unwrap();

    let failed = store.booking(booking.id);
    assert_eq!(failed.status, BookingStatus::Failed);
    assert_eq!(failed.saga_fail_reason.as_deref(), Some("slot already taken"));

    let actions: Vec<String> = store
        .histories_for(booking.id)
        .iter()
        .map(|h| h.action.clone())
        .collect();
    assert_eq!(actions, ["SAGA_STARTED", "SAGA_FAILED"]);

    // The remote side never committed capacity, so the mirror is untouched.
    assert_eq!(store.slot(TEST_SLOT_ID).booked_players, 0);
}

#[tokio::test]
async fn should_ignore_callbacks_for_unknown_bookings() {
    let store = seeded_store(4);
    let bus = MockBus::new();

    confirm_usecase(&store, &bus)
        .execute(reserved_event(999, 2))
        .await
        .unwrap();

    assert_eq!(bus.publishes().len(), 0);
}

#[tokio::test]
async fn should_not_confirm_a_booking_that_already_failed() {
    let store = seeded_store(4);
    let bus = MockBus::new();
    let booking = create_test_booking(&store, "key-late", 2).await;

    let uc = HandleSlotReserveFailedUseCase {
        bookings: MockBookingRepo {
            store: store.clone(),
        },
    };
    uc.execute(SlotReserveFailedEvent {
        booking_id: booking.id,
        game_time_slot_id: TEST_SLOT_ID,
        reason: "no capacity".to_owned(),
    })
    .await
    .unwrap();

    // Late success callback loses the race and is absorbed.
    confirm_usecase(&store, &bus)
        .execute(reserved_event(booking.id, 2))
        .await
        .unwrap();

    assert_eq!(store.booking(booking.id).status, BookingStatus::Failed);
    assert_eq!(store.slot(TEST_SLOT_ID).booked_players, 0);
    assert_eq!(bus.publishes().len(), 0);
}

#[tokio::test]
async fn should_confirm_even_when_notification_publish_fails() {
    let store = seeded_store(4);
    let bus = MockBus::new();
    bus.fail_publishes();
    let booking = create_test_booking(&store, "key-notif", 2).await;

    confirm_usecase(&store, &bus)
        .execute(reserved_event(booking.id, 2))
        .await
        .unwrap();

    // The notification is best-effort; the transition must stand.
    assert_eq!(store.booking(booking.id).status, BookingStatus::Confirmed);
}
