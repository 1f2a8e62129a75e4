use axum::{
    Router,
    routing::{get, patch, post},
};
use tower_http::trace::TraceLayer;

use parkgolf_core::health::{healthz, readyz};
use parkgolf_core::middleware::request_id_layer;

use crate::handlers::{
    availability::list_time_slots,
    booking::{
        cancel_booking, create_booking, get_booking, get_booking_by_number, get_booking_history,
        list_my_bookings, update_booking,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Bookings
        .route("/bookings", post(create_booking))
        .route("/bookings/@me", get(list_my_bookings))
        .route("/bookings/number/{booking_number}", get(get_booking_by_number))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}", patch(update_booking))
        .route("/bookings/{id}/history", get(get_booking_history))
        .route("/bookings/{id}/cancel", post(cancel_booking))
        // Availability
        .route("/games/{game_id}/time-slots", get(list_time_slots))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
