use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eh_core::{Booking, Event, EventInput, EventPatch, EventSummary};
use eh_storage::{BookingRepo, EventRepo};

use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/events",
    responses(
        (status = 200, description = "Event cards, newest first", body = [EventSummary])
    )
)]
pub async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<EventSummary>>, ApiError> {
    let pool = state.db.connection().await?;
    let events = EventRepo::new(&pool).list_summaries().await?;
    Ok(Json(events))
}

#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = EventInput,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let pool = state.db.connection().await?;
    let event = EventRepo::new(&pool).create(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Event", body = Event),
        (status = 404, description = "No such event")
    )
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let pool = state.db.connection().await?;
    let event = EventRepo::new(&pool).get_by_slug(&slug).await?;
    Ok(Json(event))
}

#[utoipa::path(
    patch,
    path = "/api/v1/events/{slug}",
    params(("slug" = String, Path, description = "Current event slug")),
    request_body = EventPatch,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "No such event"),
        (status = 409, description = "Slug already taken")
    )
)]
pub async fn update_event(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, ApiError> {
    let pool = state.db.connection().await?;
    let event = EventRepo::new(&pool).update(&slug, patch).await?;
    Ok(Json(event))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{slug}/bookings",
    params(("slug" = String, Path, description = "Event slug")),
    responses(
        (status = 200, description = "Bookings for the event", body = [Booking]),
        (status = 404, description = "No such event")
    )
)]
pub async fn list_event_bookings(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let pool = state.db.connection().await?;
    let event = EventRepo::new(&pool).get_by_slug(&slug).await?;
    let bookings = BookingRepo::new(&pool).list_for_event(event.id).await?;
    Ok(Json(bookings))
}
