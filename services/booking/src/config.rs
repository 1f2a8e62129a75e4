/// Booking service configuration loaded from environment variables.
#[derive(Debug)]
pub struct BookingConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3114). Env var: `BOOKING_PORT`.
    pub booking_port: u16,
    /// TCP port for the gRPC callback server (default 50052). Env var:
    /// `BOOKING_GRPC_PORT`.
    pub booking_grpc_port: u16,
    /// Course service gRPC URL (e.g. "http://course:50051"). Env var:
    /// `SLOT_GRPC_URL`.
    pub slot_grpc_url: String,
    /// Notification service gRPC URL. Env var: `NOTIFICATION_GRPC_URL`.
    pub notification_grpc_url: String,
}

impl BookingConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            booking_port: std::env::var("BOOKING_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3114),
            booking_grpc_port: std::env::var("BOOKING_GRPC_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50052),
            slot_grpc_url: std::env::var("SLOT_GRPC_URL").expect("SLOT_GRPC_URL"),
            notification_grpc_url: std::env::var("NOTIFICATION_GRPC_URL")
                .expect("NOTIFICATION_GRPC_URL"),
        }
    }
}
