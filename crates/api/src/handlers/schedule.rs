use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Datelike, Local};
use clinicslot_core::{
    errors::SlotError,
    models::schedule::{
        CreateScheduleRequest, RecurringSchedule, ScheduleListResponse, SetScheduleActiveRequest,
    },
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    middleware::error_handling::{AppError, AppJson},
    ApiState,
};

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
    AppJson(payload): AppJson<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<RecurringSchedule>), AppError> {
    payload.validate()?;

    let schedule = state.catalog.create_schedule(provider_id, &payload).await?;
    info!(
        "Created schedule {} for provider {} ({} - {}, days {:?})",
        schedule.id,
        provider_id,
        schedule.window_start,
        schedule.window_end,
        schedule.active_days.days()
    );

    Ok((StatusCode::CREATED, Json(schedule)))
}

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ScheduleListResponse>, AppError> {
    let schedules = state.catalog.list_schedules(provider_id).await?;
    Ok(Json(ScheduleListResponse { schedules }))
}

/// Schedules of a provider that run on the server's current local weekday
#[axum::debug_handler]
pub async fn list_today_schedules(
    State(state): State<Arc<ApiState>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<ScheduleListResponse>, AppError> {
    let today = Local::now().weekday();
    let schedules = state.catalog.schedules_on(provider_id, today).await?;
    Ok(Json(ScheduleListResponse { schedules }))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecurringSchedule>, AppError> {
    let schedule = state
        .catalog
        .get_schedule(id)
        .await?
        .ok_or_else(|| SlotError::NotFound(format!("Schedule with ID {} not found", id)))?;

    Ok(Json(schedule))
}

#[axum::debug_handler]
pub async fn set_schedule_active(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<SetScheduleActiveRequest>,
) -> Result<Json<RecurringSchedule>, AppError> {
    let schedule = state.catalog.set_active(id, payload.is_active).await?;
    info!("Schedule {} is_active={}", id, schedule.is_active);
    Ok(Json(schedule))
}
