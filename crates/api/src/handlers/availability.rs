//! # Availability Handlers
//!
//! Lists the free slots of a provider over an inclusive date range.
//!
//! The heavy lifting happens in [`SlotAllocator`]: every active schedule of
//! the provider is expanded day by day into its grid of fixed-length slots,
//! and instants already held by a booking are left out. The handler only
//! extracts parameters and wraps the result.
//!
//! Results are a snapshot. A slot listed here can be taken by a concurrent
//! booking before the client acts on it, in which case the booking endpoint
//! answers `409 Conflict`.
//!
//! [`SlotAllocator`]: clinicslot_core::SlotAllocator

use axum::{
    extract::{Path, State},
    Json,
};
use clinicslot_core::{
    errors::SlotError,
    models::slot::{AvailabilityQuery, AvailabilityResponse},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    middleware::error_handling::{AppError, AppQuery},
    ApiState,
};

/// Longest range, in days, a single availability request may span
pub const MAX_AVAILABILITY_DAYS: i64 = 366;

/// Returns the free slots of a provider
///
/// # Endpoint
///
/// ```text
/// GET /api/providers/:provider_id/availability?start_date=2024-01-08&end_date=2024-01-14
/// ```
///
/// Both dates are inclusive calendar dates. Slots come back ordered by date,
/// then by schedule (in the order the provider created them), then by start
/// time.
///
/// # Errors
///
/// * `SlotError::InvalidRange` - `end_date` is before `start_date` (400)
/// * `SlotError::Validation` - the range spans more than
///   [`MAX_AVAILABILITY_DAYS`] days, or a date is missing (400)
/// * `SlotError::Database` - storage failure (500)
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
    AppQuery(query): AppQuery<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let span = (query.end_date - query.start_date).num_days() + 1;
    if span > MAX_AVAILABILITY_DAYS {
        return Err(SlotError::Validation(format!(
            "Date range spans {} days; at most {} are allowed",
            span, MAX_AVAILABILITY_DAYS
        ))
        .into());
    }

    let slots = state
        .allocator
        .compute_availability(provider_id, query.start_date, query.end_date)
        .await?;

    Ok(Json(AvailabilityResponse { slots }))
}
