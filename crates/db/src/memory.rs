//! In-process catalog and ledger.
//!
//! Used by tests and by `STORE_BACKEND=memory` runs. Every operation takes
//! the single state lock, which makes `reserve` an atomic check-and-insert.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use clinicslot_core::{
    errors::{SlotError, SlotResult},
    models::{
        booking::{Booking, BookingRequest, BookingStatus},
        schedule::{CreateScheduleRequest, RecurringSchedule},
    },
    store::{BookingLedger, ScheduleCatalog},
};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct MemoryState {
    // insertion order doubles as creation order
    schedules: Vec<RecurringSchedule>,
    bookings: HashMap<Uuid, Booking>,
    live: HashMap<(Uuid, NaiveDateTime), Uuid>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fully formed schedule as-is, keeping its id and flags.
    pub async fn insert_schedule(&self, schedule: RecurringSchedule) {
        let mut state = self.state.lock().await;
        state.schedules.retain(|existing| existing.id != schedule.id);
        state.schedules.push(schedule);
    }
}

#[async_trait]
impl ScheduleCatalog for MemoryStore {
    async fn active_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>> {
        let state = self.state.lock().await;
        Ok(state
            .schedules
            .iter()
            .filter(|s| s.provider_id == provider_id && s.is_active)
            .cloned()
            .collect())
    }

    async fn get_schedule(&self, id: Uuid) -> SlotResult<Option<RecurringSchedule>> {
        let state = self.state.lock().await;
        Ok(state.schedules.iter().find(|s| s.id == id).cloned())
    }

    async fn list_schedules(&self, provider_id: Uuid) -> SlotResult<Vec<RecurringSchedule>> {
        let state = self.state.lock().await;
        Ok(state
            .schedules
            .iter()
            .filter(|s| s.provider_id == provider_id)
            .cloned()
            .collect())
    }

    async fn create_schedule(
        &self,
        provider_id: Uuid,
        request: &CreateScheduleRequest,
    ) -> SlotResult<RecurringSchedule> {
        let schedule = RecurringSchedule {
            id: Uuid::new_v4(),
            provider_id,
            name: request.name.trim().to_string(),
            window_start: request.window_start,
            window_end: request.window_end,
            slot_duration_minutes: request.slot_duration_minutes,
            active_days: request.active_days,
            is_active: true,
            capacity: request.capacity,
            created_at: Utc::now(),
        };

        let mut state = self.state.lock().await;
        state.schedules.push(schedule.clone());
        Ok(schedule)
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> SlotResult<RecurringSchedule> {
        let mut state = self.state.lock().await;
        let schedule = state
            .schedules
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| SlotError::NotFound(format!("Schedule with ID {} not found", id)))?;
        schedule.is_active = is_active;
        Ok(schedule.clone())
    }
}

#[async_trait]
impl BookingLedger for MemoryStore {
    async fn bookings_between(
        &self,
        schedule_ids: &[Uuid],
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .live
            .iter()
            .filter(|((schedule_id, instant), _)| {
                schedule_ids.contains(schedule_id) && *instant >= from && *instant < until
            })
            .filter_map(|(_, id)| state.bookings.get(id).cloned())
            .collect();
        bookings.sort_by_key(|booking| booking.instant);
        Ok(bookings)
    }

    async fn reserve(&self, request: &BookingRequest) -> SlotResult<Booking> {
        let mut state = self.state.lock().await;
        let key = (request.schedule_id, request.instant);
        if state.live.contains_key(&key) {
            return Err(SlotError::SlotTaken {
                schedule_id: request.schedule_id,
                instant: request.instant,
            });
        }

        let booking = Booking {
            id: Uuid::new_v4(),
            schedule_id: request.schedule_id,
            instant: request.instant,
            status: BookingStatus::Booked,
            patient_id: request.patient_id,
            notes: request.notes.clone(),
            created_at: Utc::now(),
        };
        state.live.insert(key, booking.id);
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: Uuid) -> SlotResult<Option<Booking>> {
        let state = self.state.lock().await;
        Ok(state.bookings.get(&id).cloned())
    }

    async fn provider_bookings(
        &self,
        provider_id: Uuid,
        from: NaiveDateTime,
        until: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>> {
        let state = self.state.lock().await;
        let owned: Vec<Uuid> = state
            .schedules
            .iter()
            .filter(|s| s.provider_id == provider_id)
            .map(|s| s.id)
            .collect();

        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| owned.contains(&b.schedule_id) && b.instant >= from && b.instant < until)
            .cloned()
            .collect();
        bookings.sort_by_key(|b| (b.instant, b.created_at));
        Ok(bookings)
    }

    async fn patient_bookings_after(
        &self,
        patient_id: Uuid,
        after: NaiveDateTime,
    ) -> SlotResult<Vec<Booking>> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| {
                b.patient_id == Some(patient_id) && b.status.consumes_slot() && b.instant > after
            })
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.instant);
        Ok(bookings)
    }

    async fn set_status(&self, id: Uuid, status: BookingStatus) -> SlotResult<Booking> {
        let mut state = self.state.lock().await;
        let booking = state
            .bookings
            .get_mut(&id)
            .ok_or_else(|| SlotError::NotFound(format!("Booking with ID {} not found", id)))?;
        booking.status.ensure_transition(status)?;
        booking.status = status;

        let updated = booking.clone();
        if !status.consumes_slot() {
            state.live.remove(&(updated.schedule_id, updated.instant));
        }
        Ok(updated)
    }
}
