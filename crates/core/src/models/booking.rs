use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SlotError, SlotResult};

pub const MAX_NOTES_LEN: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    CheckedIn,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Booked => "booked",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Cancelled bookings release their instant; every other status holds it.
    pub fn consumes_slot(self) -> bool {
        self != BookingStatus::Cancelled
    }

    /// Checks that a booking in this status may move to `next`.
    ///
    /// A fresh booking can be checked in or cancelled; a checked-in booking
    /// can be completed. `Completed` and `Cancelled` are final.
    pub fn ensure_transition(self, next: BookingStatus) -> SlotResult<()> {
        match (self, next) {
            (BookingStatus::Booked, BookingStatus::CheckedIn)
            | (BookingStatus::Booked, BookingStatus::Cancelled)
            | (BookingStatus::CheckedIn, BookingStatus::Completed) => Ok(()),
            (from, to) => Err(SlotError::Validation(format!(
                "Booking cannot move from {} to {}",
                from, to
            ))),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(BookingStatus::Booked),
            "checked_in" => Ok(BookingStatus::CheckedIn),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(SlotError::Validation(format!("Unknown booking status: {}", other))),
        }
    }
}

/// A committed claim on one grid instant of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub instant: NaiveDateTime,
    pub status: BookingStatus,
    pub patient_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub schedule_id: Uuid,
    pub instant: NaiveDateTime,
    #[serde(default)]
    pub patient_id: Option<Uuid>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderBookingsQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
}

impl BookingRequest {
    pub fn new(schedule_id: Uuid, instant: NaiveDateTime) -> Self {
        Self {
            schedule_id,
            instant,
            patient_id: None,
            notes: None,
        }
    }
}
