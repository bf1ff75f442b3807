//! # Booking Handlers
//!
//! Reservations go through `BookingService`, which rejects instants the
//! schedule would never generate before asking the ledger to reserve. The
//! ledger's atomic check decides races: exactly one of several concurrent
//! requests for the same schedule instant succeeds, the rest get
//! `409 Conflict`. Failed reservations are not retried here.
//!
//! Status changes follow `booked -> checked_in -> completed`, with
//! `booked -> cancelled` as the only way to give an instant back.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Local;
use clinicslot_core::models::booking::{
    Booking, BookingListResponse, BookingRequest, ProviderBookingsQuery,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::error_handling::{AppError, AppJson, AppQuery},
    ApiState,
};

/// Reserves one slot
///
/// # Endpoint
///
/// ```text
/// POST /api/bookings
/// {"schedule_id": "...", "instant": "2024-01-08T09:05:00", "patient_id": "...", "notes": "..."}
/// ```
///
/// # Errors
///
/// * `SlotError::NotFound` - unknown or inactive schedule (404)
/// * `SlotError::Validation` - instant is not a slot start of the schedule (400)
/// * `SlotError::SlotTaken` - instant already booked (409)
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    AppJson(payload): AppJson<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let booking = state.bookings.book(&payload).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[axum::debug_handler]
pub async fn get_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.get(id).await?))
}

#[axum::debug_handler]
pub async fn check_in_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.check_in(id).await?))
}

/// Cancels a booking and frees its instant for later availability queries
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.cancel(id).await?))
}

/// Marks a checked-in visit as done; the instant stays taken
#[axum::debug_handler]
pub async fn complete_booking(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    Ok(Json(state.bookings.complete(id).await?))
}

/// Lists a provider's bookings on one day
///
/// # Endpoint
///
/// ```text
/// GET /api/providers/:provider_id/bookings?date=2024-01-08
/// ```
///
/// Cancelled bookings are included so the day sheet shows them; results are
/// ordered by instant.
#[axum::debug_handler]
pub async fn list_provider_bookings(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
    AppQuery(query): AppQuery<ProviderBookingsQuery>,
) -> Result<Json<BookingListResponse>, AppError> {
    let bookings = state.bookings.provider_day(provider_id, query.date).await?;
    Ok(Json(BookingListResponse { bookings }))
}

/// Non-cancelled bookings of a patient after the server's local time
#[axum::debug_handler]
pub async fn list_upcoming_patient_bookings(
    State(state): State<Arc<ApiState>>,
    Path(patient_id): Path<Uuid>,
) -> Result<Json<BookingListResponse>, AppError> {
    let now = Local::now().naive_local();
    let bookings = state.bookings.upcoming_for_patient(patient_id, now).await?;
    Ok(Json(BookingListResponse { bookings }))
}
