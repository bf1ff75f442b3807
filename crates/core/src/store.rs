//! Collaborator interfaces the engine reads from and writes through.
//!
//! Implementations must surface storage failures as `SlotError::Database`
//! and never swallow them.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Weekday};
use uuid::Uuid;

use crate::{
    errors::SlotResult,
    models::{
        booking::{Booking, BookingRequest, BookingStatus},
        schedule::{CreateScheduleRequest, RecurringSchedule},
    },
};

/// Recurring availability definitions, grouped by provider.
#[async_trait]
pub trait ScheduleCatalog: Send + Sync {
    /// Active schedules of a provider in a stable order (creation order).
    async fn active_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>>;

    async fn get_schedule(&self, id: Uuid) -> SlotResult<Option<RecurringSchedule>>;

    /// Every schedule of a provider, active or not, in creation order.
    async fn list_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>>;

    /// Stores a new, active schedule. The request is expected to have been
    /// validated already.
    async fn create_schedule(
        &self,
        provider_id: Uuid,
        request: &CreateScheduleRequest,
    ) -> SlotResult<RecurringSchedule>;

    /// # Errors
    ///
    /// * `SlotError::NotFound` - no schedule with this id
    async fn set_active(&self, id: Uuid, is_active: bool) -> SlotResult<RecurringSchedule>;

    /// Schedules of a provider whose day mask includes `weekday`.
    async fn schedules_on(
        &self,
        provider_id: Uuid,
        weekday: Weekday,
    ) -> SlotResult<Vec<RecurringSchedule>> {
        let schedules = self.list_schedules(provider_id).await?;
        Ok(schedules
            .into_iter()
            .filter(|schedule| schedule.active_days.contains(weekday))
            .collect())
    }
}

/// Committed reservations.
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Bookings that still hold their instant (anything not cancelled) for
    /// the given schedules with `from <= instant < until`.
    async fn bookings_between(
        &self,
        schedule_ids: &[Uuid],
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>>;

    /// Atomically records a booking unless a non-cancelled booking already
    /// holds `(schedule_id, instant)`. Does not check that the instant lies on
    /// the schedule's grid.
    ///
    /// # Errors
    ///
    /// * `SlotError::SlotTaken` - the pair is already held
    async fn reserve(&self, request: &BookingRequest) -> SlotResult<Booking>;

    async fn get_booking(&self, id: Uuid) -> SlotResult<Option<Booking>>;

    /// Every booking (cancelled ones included) on any schedule of the
    /// provider with `from <= instant < until`, ordered by instant.
    async fn provider_bookings(
        &self,
        provider_id: Uuid,
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>>;

    /// Non-cancelled bookings of a patient strictly after `after`, ordered by
    /// instant.
    async fn patient_bookings_after(
        &self,
        patient_id: Uuid,
        after: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>>;

    /// # Errors
    ///
    /// * `SlotError::NotFound` - no booking with this id
    /// * `SlotError::Validation` - the transition is not allowed
    async fn set_status(&self, id: Uuid, status: BookingStatus) -> SlotResult<Booking>;
}
