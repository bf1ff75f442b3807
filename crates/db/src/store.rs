use async_trait::async_trait;
use chrono::{NaiveDateTime, Weekday};
use clinicslot_core::{
    errors::{SlotError, SlotResult},
    models::{
        booking::{Booking, BookingRequest, BookingStatus},
        schedule::{CreateScheduleRequest, RecurringSchedule},
    },
    store::{BookingLedger, ScheduleCatalog},
    weekdays::day_number,
};
use uuid::Uuid;

use crate::{repositories, DbPool};

/// Catalog and ledger backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

fn to_schedules(rows: Vec<crate::models::DbSchedule>) -> SlotResult<Vec<RecurringSchedule>> {
    rows.into_iter().map(RecurringSchedule::try_from).collect()
}

#[async_trait]
impl ScheduleCatalog for PgStore {
    async fn active_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>> {
        let rows = repositories::schedule::get_schedules_by_provider_id(&self.pool, provider_id, true).await?;
        to_schedules(rows)
    }

    async fn get_schedule(&self, id: Uuid) -> SlotResult<Option<RecurringSchedule>> {
        repositories::schedule::get_schedule_by_id(&self.pool, id)
            .await?
            .map(RecurringSchedule::try_from)
            .transpose()
    }

    async fn list_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>> {
        let rows = repositories::schedule::get_schedules_by_provider_id(&self.pool, provider_id, false).await?;
        to_schedules(rows)
    }

    async fn create_schedule(
        &self,
        provider_id: Uuid,
        request: &CreateScheduleRequest,
    ) -> SlotResult<RecurringSchedule> {
        let slot_duration_minutes = i32::try_from(request.slot_duration_minutes)
            .map_err(|_| SlotError::Validation("slot_duration_minutes is too large".to_string()))?;
        let capacity = i32::try_from(request.capacity)
            .map_err(|_| SlotError::Validation("capacity is too large".to_string()))?;

        let row = repositories::schedule::create_schedule(
            &self.pool,
            provider_id,
            request.name.trim(),
            request.window_start,
            request.window_end,
            slot_duration_minutes,
            i16::from(request.active_days.bits()),
            capacity,
        )
        .await?;

        row.try_into()
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> SlotResult<RecurringSchedule> {
        repositories::schedule::set_schedule_active(&self.pool, id, is_active)
            .await?
            .ok_or_else(|| SlotError::NotFound(format!("Schedule with ID {} not found", id)))?
            .try_into()
    }

    async fn schedules_on(
        &self,
        provider_id: Uuid,
        weekday: Weekday,
    ) -> SlotResult<Vec<RecurringSchedule>> {
        let rows =
            repositories::schedule::get_schedules_by_weekday(&self.pool, provider_id, day_number(weekday)).await?;
        to_schedules(rows)
    }
}

#[async_trait]
impl BookingLedger for PgStore {
    async fn bookings_between(
        &self,
        schedule_ids: &[Uuid],
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>> {
        repositories::booking::get_live_bookings_in_range(&self.pool, schedule_ids, from, until)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn reserve(&self, request: &BookingRequest) -> SlotResult<Booking> {
        repositories::booking::reserve_booking(
            &self.pool,
            request.schedule_id,
            request.instant,
            request.patient_id,
            request.notes.as_deref(),
        )
        .await?
        .ok_or(SlotError::SlotTaken {
            schedule_id: request.schedule_id,
            instant: request.instant,
        })?
        .try_into()
    }

    async fn get_booking(&self, id: Uuid) -> SlotResult<Option<Booking>> {
        repositories::booking::get_booking_by_id(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn provider_bookings(
        &self,
        provider_id: Uuid,
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>> {
        repositories::booking::get_provider_bookings_in_range(&self.pool, provider_id, from, until)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn patient_bookings_after(
        &self,
        patient_id: Uuid,
        after: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>> {
        repositories::booking::get_patient_bookings_after(&self.pool, patient_id, after)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> SlotResult<Booking> {
        let current = self
            .get_booking(id)
            .await?
            .ok_or_else(|| SlotError::NotFound(format!("Booking with ID {} not found", id)))?;
        current.status.ensure_transition(status)?;

        // the status guard in the UPDATE turns a concurrent transition into a miss
        repositories::booking::update_booking_status(
            &self.pool,
            id,
            current.status.as_str(),
            status.as_str(),
        )
        .await?
        .ok_or_else(|| {
            SlotError::Validation(format!(
                "Booking {} changed status concurrently; expected {}",
                id, current.status
            ))
        })?
        .try_into()
    }
}
