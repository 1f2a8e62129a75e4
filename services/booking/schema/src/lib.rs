//! sea-orm entities for the booking service database.

pub mod booking_histories;
pub mod bookings;
pub mod game_cache;
pub mod game_time_slot_cache;
pub mod idempotency_keys;
pub mod outbox_events;
