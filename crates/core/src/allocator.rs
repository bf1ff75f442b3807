//! # Slot Allocation
//!
//! Turns a provider's recurring schedules into concrete free slots for a date
//! range:
//!
//! 1. Reject ranges whose end precedes their start.
//! 2. Load the provider's active schedules; none means no slots.
//! 3. Load the bookings that still hold an instant in
//!    `[start_date 00:00, end_date + 1 day 00:00)` and index them by
//!    `(schedule_id, instant)`.
//! 4. For every date (ascending) and every schedule running that weekday (in
//!    catalog order), walk the schedule's grid and keep each instant that is
//!    not booked.
//!
//! Output order is generation order: date, then schedule, then time. Nothing
//! is sorted afterwards and the advisory schedule capacity is not applied.
//!
//! Allocation only reads. A slot reported free can still be taken by a
//! concurrent reservation before the caller acts on it; exclusivity is the
//! ledger's job.

use std::{collections::HashSet, sync::Arc};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    errors::{SlotError, SlotResult},
    models::{schedule::RecurringSchedule, slot::Slot},
    store::{BookingLedger, ScheduleCatalog},
};

/// Set of `(schedule_id, instant)` pairs already taken.
pub type BookedInstants = HashSet<(Uuid, NaiveDateTime)>;

pub fn validate_range(start_date: NaiveDate, end_date: NaiveDate) -> SlotResult<()> {
    if end_date < start_date {
        return Err(SlotError::InvalidRange {
            start: start_date,
            end: end_date,
        });
    }
    Ok(())
}

/// Half-open instant range covering every day from `start_date` to
/// `end_date` inclusive.
pub fn instant_range(start_date: NaiveDate, end_date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let from = start_date.and_time(NaiveTime::MIN);
    let until = end_date
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (from, until)
}

/// Computes free slots from explicit inputs.
///
/// `schedules` are used in the order given and are assumed to be active and
/// valid.
pub fn allocate(
    schedules: &[RecurringSchedule],
    booked: &BookedInstants,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> SlotResult<Vec<Slot>> {
    validate_range(start_date, end_date)?;

    let mut slots = Vec::new();
    for date in start_date.iter_days().take_while(|date| *date <= end_date) {
        for schedule in schedules.iter().filter(|s| s.runs_on(date)) {
            let step = schedule.slot_duration();
            for start in schedule.grid(date) {
                if booked.contains(&(schedule.id, start)) {
                    continue;
                }
                slots.push(Slot {
                    schedule_id: schedule.id,
                    provider_id: schedule.provider_id,
                    date,
                    start_time: start.time(),
                    end_time: (start + step).time(),
                });
            }
        }
    }

    Ok(slots)
}

/// Availability engine over injected collaborators.
///
/// Holds no mutable state, so a single instance can serve concurrent
/// requests.
#[derive(Clone)]
pub struct SlotAllocator {
    catalog: Arc<dyn ScheduleCatalog>,
    ledger: Arc<dyn BookingLedger>,
}

impl SlotAllocator {
    pub fn new(catalog: Arc<dyn ScheduleCatalog>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// Free slots of `provider_id` between `start_date` and `end_date`,
    /// both inclusive.
    ///
    /// # Errors
    ///
    /// * `SlotError::InvalidRange` - `end_date` is before `start_date`; no
    ///   collaborator is read in that case
    /// * any error raised by the catalog or the ledger, unchanged
    pub async fn compute_availability(
        &self,
        provider_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SlotResult<Vec<Slot>> {
        validate_range(start_date, end_date)?;

        let schedules = self.catalog.active_schedules(provider_id).await?;
        if schedules.is_empty() {
            debug!("No active schedules for provider {}", provider_id);
            return Ok(Vec::new());
        }

        let schedule_ids: Vec<Uuid> = schedules.iter().map(|s| s.id).collect();
        let (from, until) = instant_range(start_date, end_date);
        let booked: BookedInstants = self
            .ledger
            .bookings_between(&schedule_ids, from, until)
            .await?
            .into_iter()
            .map(|booking| (booking.schedule_id, booking.instant))
            .collect();

        let slots = allocate(&schedules, &booked, start_date, end_date)?;
        debug!(
            "Provider {}: {} schedules, {} booked, {} free slots from {} to {}",
            provider_id,
            schedules.len(),
            booked.len(),
            slots.len(),
            start_date,
            end_date
        );

        Ok(slots)
    }
}
