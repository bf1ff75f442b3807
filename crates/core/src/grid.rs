use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Start instants of the fixed-length slots that fit inside one day's window.
///
/// Yields `day + window_start + k * step` for every `k` such that the slot
/// starting there ends no later than `day + window_end`. Both slot listing
/// and booking validation go through this iterator so that booked instants
/// and generated instants always come from the same arithmetic.
#[derive(Debug, Clone)]
pub struct GridInstants {
    cursor: NaiveDateTime,
    limit: NaiveDateTime,
    step: Duration,
}

impl GridInstants {
    pub fn new(day: NaiveDate, window_start: NaiveTime, window_end: NaiveTime, step: Duration) -> Self {
        Self {
            cursor: day.and_time(window_start),
            limit: day.and_time(window_end),
            step,
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }
}

impl Iterator for GridInstants {
    type Item = NaiveDateTime;

    fn next(&mut self) -> Option<Self::Item> {
        // a non-positive step would never leave the window
        if self.step <= Duration::zero() {
            return None;
        }

        let end = self.cursor.checked_add_signed(self.step)?;
        if end > self.limit {
            return None;
        }

        let start = self.cursor;
        self.cursor = end;
        Some(start)
    }
}
