use parkgolf_booking::domain::repository::BookingRepository;
use parkgolf_booking::domain::types::{BookingStatus, SAGA_TIMEOUT_SECS};
use parkgolf_booking::usecase::sweeper::SweepTimedOutBookingsUseCase;

use crate::helpers::{MockBookingRepo, TestStore, create_test_booking, seeded_store};

fn sweeper(store: &TestStore) -> SweepTimedOutBookingsUseCase<MockBookingRepo> {
    SweepTimedOutBookingsUseCase {
        bookings: MockBookingRepo {
            store: store.clone(),
        },
    }
}

#[tokio::test]
async fn should_fail_pending_bookings_past_the_deadline() {
    let store = seeded_store(4);
    let booking = create_test_booking(&store, "key-stale", 2).await;
    store.backdate_booking(booking.id, SAGA_TIMEOUT_SECS + 5);

    let swept = sweeper(&store).execute().await.unwrap();

    assert_eq!(swept, 1);
    let failed = store.booking(booking.id);
    assert_eq!(failed.status, BookingStatus::Failed);
    assert!(failed.saga_fail_reason.unwrap().contains("timeout"));

    let actions: Vec<String> = store
        .histories_for(booking.id)
        .iter()
        .map(|h| h.action.clone())
        .collect();
    assert_eq!(actions, ["SAGA_STARTED", "SAGA_TIMEOUT"]);
}

#[tokio::test]
async fn should_leave_recent_pending_bookings_untouched() {
    let store = seeded_store(4);
    let booking = create_test_booking(&store, "key-fresh", 2).await;

    let swept = sweeper(&store).execute().await.unwrap();

    assert_eq!(swept, 0);
    assert_eq!(store.booking(booking.id).status, BookingStatus::Pending);
}

#[tokio::test]
async fn should_not_touch_resolved_bookings() {
    let store = seeded_store(4);
    let booking = create_test_booking(&store, "key-resolved", 2).await;
    let repo = MockBookingRepo {
        store: store.clone(),
    };
    assert!(repo.confirm(&booking, "2026-08-07T09:00:00Z").await.unwrap());
    store.backdate_booking(booking.id, SAGA_TIMEOUT_SECS + 300);

    let swept = sweeper(&store).execute().await.unwrap();

    assert_eq!(swept, 0);
    assert_eq!(store.booking(booking.id).status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn should_sweep_each_stale_booking_exactly_once() {
    let store = seeded_store(4);
    let first = create_test_booking(&store, "key-a", 1).await;
    let second = create_test_booking(&store, "key-b", 1).await;
    store.backdate_booking(first.id, SAGA_TIMEOUT_SECS + 10);
    store.backdate_booking(second.id, SAGA_TIMEOUT_SECS + 10);

    assert_eq!(sweeper(&store).execute().await.unwrap(), 2);
    // A second pass finds nothing left to fail.
    assert_eq!(sweeper(&store).execute().await.unwrap(), 0);
}
