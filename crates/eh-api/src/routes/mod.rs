use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::AppState;

pub mod bookings;
pub mod events;
pub mod health;

/// All API routes bound to the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/api/v1/ping", get(health::ping))
        .route(
            "/api/v1/events",
            get(events::list_events).post(events::create_event),
        )
        .route(
            "/api/v1/events/{slug}",
            get(events::get_event).patch(events::update_event),
        )
        .route(
            "/api/v1/events/{slug}/bookings",
            get(events::list_event_bookings),
        )
        .route("/api/v1/bookings", post(bookings::create_booking))
        .route("/api/v1/bookings/{id}", patch(bookings::update_booking))
        .with_state(state)
}
