use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use clinicslot_core::{
    errors::{SlotError, SlotResult},
    models::{
        booking::{Booking, BookingStatus},
        schedule::RecurringSchedule,
    },
    weekdays::DayMask,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbSchedule {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub name: String,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub slot_duration_minutes: i32,
    pub active_days: i16,
    pub is_active: bool,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub instant: NaiveDateTime,
    pub status: String,
    pub patient_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

fn column_out_of_range(column: &str, value: i64) -> SlotError {
    SlotError::Database(eyre::eyre!("Column {} holds out-of-range value {}", column, value))
}

impl TryFrom<DbSchedule> for RecurringSchedule {
    type Error = SlotError;

    fn try_from(row: DbSchedule) -> SlotResult<Self> {
        let slot_duration_minutes = u32::try_from(row.slot_duration_minutes)
            .map_err(|_| column_out_of_range("slot_duration_minutes", row.slot_duration_minutes.into()))?;
        let capacity = u32::try_from(row.capacity)
            .map_err(|_| column_out_of_range("capacity", row.capacity.into()))?;
        let active_days = u8::try_from(row.active_days)
            .ok()
            .and_then(|bits| DayMask::from_bits(bits).ok())
            .ok_or_else(|| column_out_of_range("active_days", row.active_days.into()))?;

        Ok(RecurringSchedule {
            id: row.id,
            provider_id: row.provider_id,
            name: row.name,
            window_start: row.window_start,
            window_end: row.window_end,
            slot_duration_minutes,
            active_days,
            is_active: row.is_active,
            capacity,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = SlotError;

    fn try_from(row: DbBooking) -> SlotResult<Self> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|_| SlotError::Database(eyre::eyre!("Unknown booking status {:?}", row.status)))?;

        Ok(Booking {
            id: row.id,
            schedule_id: row.schedule_id,
            instant: row.instant,
            status,
            patient_id: row.patient_id,
            notes: row.notes,
            created_at: row.created_at,
        })
    }
}
