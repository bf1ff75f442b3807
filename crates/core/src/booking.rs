use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    allocator::instant_range,
    errors::{SlotError, SlotResult},
    models::booking::{Booking, BookingRequest, BookingStatus, MAX_NOTES_LEN},
    store::{BookingLedger, ScheduleCatalog},
};

/// Validated write path in front of the ledger.
///
/// The ledger only guarantees exclusivity. This service additionally makes
/// sure a booking targets an active schedule on one of its grid instants,
/// since an off-grid booking would never be matched by the allocator.
#[derive(Clone)]
pub struct BookingService {
    catalog: Arc<dyn ScheduleCatalog>,
    ledger: Arc<dyn BookingLedger>,
}

impl BookingService {
    pub fn new(catalog: Arc<dyn ScheduleCatalog>, ledger: Arc<dyn BookingLedger>) -> Self {
        Self { catalog, ledger }
    }

    /// # Errors
    ///
    /// * `SlotError::NotFound` - the schedule does not exist or is inactive
    /// * `SlotError::Validation` - notes too long, or the instant is not a
    ///   slot start the schedule generates
    /// * `SlotError::SlotTaken` - someone else holds the instant
    pub async fn book(&self, request: &BookingRequest) -> SlotResult<Booking> {
        if let Some(notes) = &request.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(SlotError::Validation(format!(
                    "notes must be at most {} characters",
                    MAX_NOTES_LEN
                )));
            }
        }

        let schedule = self
            .catalog
            .get_schedule(request.schedule_id)
            .await?
            .filter(|schedule| schedule.is_active)
            .ok_or_else(|| {
                SlotError::NotFound(format!(
                    "Schedule with ID {} not found or inactive",
                    request.schedule_id
                ))
            })?;

        if !schedule.runs_on(request.instant.date()) {
            return Err(SlotError::Validation(format!(
                "Schedule {} does not run on {}",
                schedule.id,
                request.instant.date().format("%A %Y-%m-%d")
            )));
        }
        if !schedule.generates(request.instant) {
            return Err(SlotError::Validation(format!(
                "{} is not a slot start of schedule {}",
                request.instant, schedule.id
            )));
        }

        match self.ledger.reserve(request).await {
            Ok(booking) => {
                info!(
                    "Booked schedule {} at {} (booking {})",
                    booking.schedule_id, booking.instant, booking.id
                );
                Ok(booking)
            }
            Err(err @ SlotError::SlotTaken { .. }) => {
                warn!("{}", err);
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn get(&self, id: Uuid) -> SlotResult<Booking> {
        self.ledger
            .get_booking(id)
            .await?
            .ok_or_else(|| SlotError::NotFound(format!("Booking with ID {} not found", id)))
    }

    pub async fn check_in(&self, id: Uuid) -> SlotResult<Booking> {
        self.ledger.set_status(id, BookingStatus::CheckedIn).await
    }

    /// Cancels a booking, releasing its instant for later allocation runs.
    pub async fn cancel(&self, id: Uuid) -> SlotResult<Booking> {
        let booking = self.ledger.set_status(id, BookingStatus::Cancelled).await?;
        info!("Cancelled booking {}", booking.id);
        Ok(booking)
    }

    /// Closes a checked-in visit. The instant stays taken.
    pub async fn complete(&self, id: Uuid) -> SlotResult<Booking> {
        let booking = self.ledger.set_status(id, BookingStatus::Completed).await?;
        info!("Completed booking {}", booking.id);
        Ok(booking)
    }

    /// A provider's bookings on one calendar day, cancelled ones included.
    pub async fn provider_day(&self, provider_id: Uuid, date: NaiveDate) -> SlotResult<Vec<Booking>> {
        let (from, until) = instant_range(date, date);
        self.ledger.provider_bookings(provider_id, from, until).await
    }

    /// A patient's non-cancelled bookings later than `now`.
    pub async fn upcoming_for_patient(
        &self,
        patient_id: Uuid,
        now: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>> {
        self.ledger.patient_bookings_after(patient_id, now).await
    }
}
