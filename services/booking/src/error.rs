use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Booking service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum BookingServiceError {
    #[error("booking not found")]
    BookingNotFound,
    #[error("game not found")]
    GameNotFound,
    #[error("time slot not found")]
    SlotNotFound,
    #[error("time slot not available")]
    SlotUnavailable,
    #[error("not enough remaining capacity")]
    InsufficientCapacity,
    #[error("booking already cancelled")]
    AlreadyCancelled,
    #[error("booking status does not permit this operation")]
    InvalidStatus,
    #[error("cancellation window closed")]
    CancellationWindowClosed,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl BookingServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BookingNotFound => "BOOKING_NOT_FOUND",
            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::SlotNotFound => "SLOT_NOT_FOUND",
            Self::SlotUnavailable => "SLOT_UNAVAILABLE",
            Self::InsufficientCapacity => "INSUFFICIENT_CAPACITY",
            Self::AlreadyCancelled => "ALREADY_CANCELLED",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::CancellationWindowClosed => "CANCELLATION_WINDOW_CLOSED",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for BookingServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::BookingNotFound | Self::GameNotFound | Self::SlotNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::SlotUnavailable
            | Self::InsufficientCapacity
            | Self::CancellationWindowClosed
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::AlreadyCancelled | Self::InvalidStatus => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status for all
        // requests. 4xx are expected client errors; logging them here would be noise.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
