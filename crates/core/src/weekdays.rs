//! Weekday selection for recurring schedules.
//!
//! Days are numbered Sunday = 0 through Saturday = 6, and bit *i* of a
//! [`DayMask`] is set when the schedule runs on day *i*. Requests and
//! responses carry the mask as a list of day numbers, e.g. `[1, 3, 5]` for
//! Monday, Wednesday and Friday.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::{SlotError, SlotResult};

/// Number of the given weekday, Sunday = 0 through Saturday = 6.
pub fn day_number(weekday: Weekday) -> u8 {
    weekday.num_days_from_sunday() as u8
}

/// Number of the weekday `date` falls on, Sunday = 0 through Saturday = 6.
pub fn day_number_of(date: NaiveDate) -> u8 {
    day_number(date.weekday())
}

/// A 7-bit set of weekdays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<u8>")]
pub struct DayMask(u8);

impl DayMask {
    pub const EMPTY: DayMask = DayMask(0);
    pub const ALL: DayMask = DayMask(0b111_1111);

    /// Builds a mask from its raw bit representation.
    ///
    /// # Errors
    ///
    /// * `SlotError::Validation` - bits above bit 6 are set
    pub fn from_bits(bits: u8) -> SlotResult<Self> {
        if bits > Self::ALL.0 {
            return Err(SlotError::Validation(format!(
                "Day mask {} is out of range (0-127)",
                bits
            )));
        }
        Ok(Self(bits))
    }

    /// Builds a mask from day numbers (Sunday = 0 through Saturday = 6).
    /// Duplicates are accepted.
    ///
    /// # Errors
    ///
    /// * `SlotError::Validation` - a day number is greater than 6
    pub fn from_days(days: &[u8]) -> SlotResult<Self> {
        days.iter()
            .try_fold(Self::EMPTY, |mask, &day| Ok(Self(mask.0 | day_bit(i64::from(day))?)))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Day numbers contained in the mask, ascending.
    pub fn days(self) -> Vec<u8> {
        (0..7).filter(|day| self.0 & (1 << day) != 0).collect()
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        self.0 & (1 << day_number(weekday)) != 0
    }

    pub fn contains_date(self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn with(self, weekday: Weekday) -> Self {
        Self(self.0 | (1 << day_number(weekday)))
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl FromIterator<Weekday> for DayMask {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, DayMask::with)
    }
}

fn day_bit(day: i64) -> SlotResult<u8> {
    match u8::try_from(day) {
        Ok(day) if day <= 6 => Ok(1 << day),
        _ => Err(SlotError::Validation(format!(
            "Day number {} is out of range (0 = Sunday to 6 = Saturday)",
            day
        ))),
    }
}

// Wide input type so that any integer gets the day-range message
impl TryFrom<Vec<i64>> for DayMask {
    type Error = SlotError;

    fn try_from(days: Vec<i64>) -> Result<Self, Self::Error> {
        days.into_iter()
            .try_fold(Self::EMPTY, |mask, day| Ok(Self(mask.0 | day_bit(day)?)))
    }
}

impl From<DayMask> for Vec<u8> {
    fn from(mask: DayMask) -> Self {
        mask.days()
    }
}
