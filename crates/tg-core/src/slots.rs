//! Time grid rows.
//!
//! The same slot sequence drives both the hour gutter and every date column,
//! so gridlines and event blocks stay aligned.

use std::iter::FusedIterator;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::position::MINUTES_PER_DAY;
use crate::types::LayoutError;

/// Default row height in minutes.
pub const DEFAULT_STEP_MINUTES: u32 = 60;

/// The start of one grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    pub hour: u32,
    pub minute: u32,
}

impl TimeSlot {
    /// Minutes from midnight to this slot.
    pub const fn minutes(self) -> u32 {
        self.hour * 60 + self.minute
    }

    /// The instant a press on this row of `date`'s column refers to.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0)
            .map_or_else(|| date.and_time(NaiveTime::MIN), |time| date.and_time(time))
    }

    /// Gutter label, e.g. `"9:00"` / `"13:30"` or `"9 AM"` / `"1:30 PM"`.
    pub fn label(self, ampm: bool) -> String {
        if !ampm {
            return format!("{}:{:02}", self.hour, self.minute);
        }

        let suffix = if self.hour < 12 { "AM" } else { "PM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        if self.minute == 0 {
            format!("{hour} {suffix}")
        } else {
            format!("{hour}:{:02} {suffix}", self.minute)
        }
    }
}

/// Lazily yields the rows of one day at a fixed step.
///
/// A clone continues from the same row; [`Slots::restart`] starts over at midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slots {
    step: u32,
    next: u32,
}

impl Slots {
    /// Step between rows, in minutes.
    pub const fn step(&self) -> u32 {
        self.step
    }

    /// A new pass over the same day from midnight.
    #[must_use]
    pub const fn restart(&self) -> Self {
        Self {
            step: self.step,
            next: 0,
        }
    }
}

impl Iterator for Slots {
    type Item = TimeSlot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= MINUTES_PER_DAY {
            return None;
        }
        let slot = TimeSlot {
            hour: self.next / 60,
            minute: self.next % 60,
        };
        self.next = self.next.saturating_add(self.step);
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = MINUTES_PER_DAY.saturating_sub(self.next).div_ceil(self.step);
        let remaining = remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Slots {}

impl FusedIterator for Slots {}

/// Rows for one day at `step_minutes`.
///
/// A step that does not divide the day leaves a shorter final row.
pub fn generate_slots(step_minutes: u32) -> Result<Slots, LayoutError> {
    if step_minutes == 0 {
        return Err(LayoutError::InvalidStep { step: step_minutes });
    }
    Ok(Slots {
        step: step_minutes,
        next: 0,
    })
}
