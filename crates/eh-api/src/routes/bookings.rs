use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use eh_core::{Booking, BookingId, BookingInput, BookingPatch};
use eh_storage::BookingRepo;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = BookingInput,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Invalid email"),
        (status = 409, description = "Email already booked for this event"),
        (status = 422, description = "Referenced event does not exist")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    Json(input): Json<BookingInput>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let pool = state.db.connection().await?;
    let booking = BookingRepo::new(&pool).create(input).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}",
    params(("id" = String, Path, description = "Booking id")),
    request_body = BookingPatch,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 404, description = "No such booking"),
        (status = 409, description = "Email already booked for this event"),
        (status = 422, description = "Referenced event does not exist")
    )
)]
pub async fn update_booking(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<BookingPatch>,
) -> Result<Json<Booking>, ApiError> {
    let pool = state.db.connection().await?;
    let booking = BookingRepo::new(&pool).update(BookingId(id), patch).await?;
    Ok(Json(booking))
}
