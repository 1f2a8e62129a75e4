use sea_orm_migration::prelude::*;

mod m20260601_000001_create_bookings;
mod m20260601_000002_create_booking_histories;
mod m20260601_000003_create_outbox_events;
mod m20260601_000004_create_idempotency_keys;
mod m20260601_000005_create_game_cache;
mod m20260601_000006_create_game_time_slot_cache;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260601_000001_create_bookings::Migration),
            Box::new(m20260601_000002_create_booking_histories::Migration),
            Box::new(m20260601_000003_create_outbox_events::Migration),
            Box::new(m20260601_000004_create_idempotency_keys::Migration),
            Box::new(m20260601_000005_create_game_cache::Migration),
            Box::new(m20260601_000006_create_game_time_slot_cache::Migration),
        ]
    }
}
