pub mod availability;
pub mod cancel_booking;
pub mod create_booking;
pub mod get_booking;
pub mod saga;
pub mod sweeper;
pub mod sync_cache;
pub mod update_booking;
