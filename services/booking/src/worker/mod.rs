pub mod outbox;
pub mod timeout;
