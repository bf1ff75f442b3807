use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{SlotError, SlotResult},
    grid::GridInstants,
    models::hhmm,
    weekdays::DayMask,
};

pub const DEFAULT_SLOT_DURATION_MINUTES: u32 = 5;
pub const MAX_SLOT_DURATION_MINUTES: u32 = 60;
pub const DEFAULT_CAPACITY: u32 = 20;
pub const MAX_CAPACITY: u32 = 100;
pub const MAX_NAME_LEN: usize = 100;

/// A provider's repeating weekly availability window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringSchedule {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub name: String,
    #[serde(with = "hhmm")]
    pub window_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub window_end: NaiveTime,
    pub slot_duration_minutes: u32,
    pub active_days: DayMask,
    pub is_active: bool,
    /// Advisory number of patients per day. Not enforced by allocation.
    pub capacity: u32,
    pub created_at: DateTime<Utc>,
}

impl RecurringSchedule {
    pub fn slot_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.slot_duration_minutes))
    }

    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.active_days.contains_date(date)
    }

    /// Slot start instants for `date`, ignoring the day mask.
    pub fn grid(&self, date: NaiveDate) -> GridInstants {
        GridInstants::new(date, self.window_start, self.window_end, self.slot_duration())
    }

    /// Whether this schedule would ever produce a slot starting at `instant`.
    pub fn generates(&self, instant: NaiveDateTime) -> bool {
        let date = instant.date();
        self.runs_on(date) && self.grid(date).any(|start| start == instant)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub name: String,
    #[serde(with = "hhmm")]
    pub window_start: NaiveTime,
    #[serde(with = "hhmm")]
    pub window_end: NaiveTime,
    #[serde(default = "default_slot_duration")]
    pub slot_duration_minutes: u32,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub active_days: DayMask,
}

fn default_slot_duration() -> u32 {
    DEFAULT_SLOT_DURATION_MINUTES
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

impl CreateScheduleRequest {
    /// Checks the invariants every stored schedule must satisfy.
    ///
    /// # Errors
    ///
    /// * `SlotError::Validation` - empty or overlong name, window not
    ///   strictly increasing, window bounds not on whole minutes, slot
    ///   duration outside 1-60 minutes, capacity outside 1-100
    pub fn validate(&self) -> SlotResult<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(SlotError::Validation("Schedule name must not be empty".to_string()));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(SlotError::Validation(format!(
                "Schedule name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        if self.window_end <= self.window_start {
            return Err(SlotError::Validation(
                "window_end must be later than window_start".to_string(),
            ));
        }
        if !on_whole_minute(self.window_start) || !on_whole_minute(self.window_end) {
            return Err(SlotError::Validation(
                "Window bounds must fall on whole minutes".to_string(),
            ));
        }
        if !(1..=MAX_SLOT_DURATION_MINUTES).contains(&self.slot_duration_minutes) {
            return Err(SlotError::Validation(format!(
                "slot_duration_minutes must be between 1 and {}",
                MAX_SLOT_DURATION_MINUTES
            )));
        }
        if !(1..=MAX_CAPACITY).contains(&self.capacity) {
            return Err(SlotError::Validation(format!(
                "capacity must be between 1 and {}",
                MAX_CAPACITY
            )));
        }
        Ok(())
    }
}

fn on_whole_minute(time: NaiveTime) -> bool {
    time.second() == 0 && time.nanosecond() == 0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetScheduleActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub schedules: Vec<RecurringSchedule>,
}
