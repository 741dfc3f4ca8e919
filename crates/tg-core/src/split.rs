//! Multi-day event splitting.
//!
//! A date column renders an event in one of three ways:
//!
//! ```text
//!   M  T  (W)  T  F      case
//!         S-E            same-day: starts on the column's date
//!   S------E             tail: started earlier, ends on this date
//!      S-------E         middle: started earlier, ends after this date
//! ```
//!
//! Day bounds are half-open: `[00:00, next 00:00)`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::event::{CalendarEventBase, span_of};

/// How an event relates to the date it is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitCase {
    /// The event starts on this date.
    SameDay,
    /// The event started on an earlier date and ends on this one.
    Tail,
    /// The event started on an earlier date and ends after this one.
    Middle,
}

/// Which day clipped tail and middle blocks are anchored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAnchor {
    /// Clip to the day the event ends on, whatever date is being rendered.
    ///
    /// Every middle day of a long event gets the full-day bounds of the
    /// final day, so a middle block never stacks against that column's own
    /// events.
    #[default]
    EventEnd,
    /// Clip to the date being rendered.
    ///
    /// Middle blocks cover the column's own day and stack with its events.
    RenderDate,
}

/// An event clipped to a single date column.
#[derive(Debug)]
pub struct ClippedEvent<'a, E> {
    pub source: &'a E,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub case: SplitCase,
}

impl<E> Clone for ClippedEvent<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for ClippedEvent<'_, E> {}

impl<E: CalendarEventBase> CalendarEventBase for ClippedEvent<'_, E> {
    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }

    fn title(&self) -> &str {
        self.source.title()
    }
}

/// Midnight at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Midnight at the start of the following day (exclusive end of `date`).
pub fn next_day_start(date: NaiveDate) -> NaiveDateTime {
    date.succ_opt().map_or(NaiveDateTime::MAX, start_of_day)
}

/// The calendar date holding the last instant an event covers.
///
/// An event ending exactly at midnight ends on the previous day.
/// Zero-length and inverted events end on their start date.
pub fn last_day_of(start: NaiveDateTime, end: NaiveDateTime) -> NaiveDate {
    if end <= start {
        return start.date();
    }
    if end.time() == NaiveTime::MIN {
        return end.date().pred_opt().unwrap_or_else(|| end.date());
    }
    end.date()
}

/// Classifies an interval against a render date.
///
/// Cases are checked in priority order: same-day, tail, middle.
pub fn classify(start: NaiveDateTime, end: NaiveDateTime, date: NaiveDate) -> Option<SplitCase> {
    let day_start = start_of_day(date);
    let day_end = next_day_start(date);
    let end = end.max(start);

    if start >= day_start && start < day_end {
        Some(SplitCase::SameDay)
    } else if start < day_start && end > day_start && end <= day_end {
        Some(SplitCase::Tail)
    } else if start < day_start && end > day_end {
        Some(SplitCase::Middle)
    } else {
        None
    }
}

/// Splits `event` for `date`, anchoring tail and middle blocks on the day
/// the event ends.
pub fn split_for_date<E: CalendarEventBase>(
    event: &E,
    date: NaiveDate,
) -> Option<ClippedEvent<'_, E>> {
    split_for_date_with(event, date, SplitAnchor::default())
}

/// Splits `event` for `date` using an explicit anchor for clipped bounds.
///
/// Same-day events keep their original bounds, even when they run past
/// midnight; cutting the overflow off is left to the renderer.
pub fn split_for_date_with<E: CalendarEventBase>(
    event: &E,
    date: NaiveDate,
    anchor: SplitAnchor,
) -> Option<ClippedEvent<'_, E>> {
    let (start, end) = span_of(event);
    let case = classify(start, end, date)?;

    let (start, end) = match (case, anchor) {
        (SplitCase::SameDay, _) => (event.start(), event.end()),
        (SplitCase::Tail, SplitAnchor::RenderDate) => (start_of_day(date), end),
        (SplitCase::Middle, SplitAnchor::RenderDate) => (start_of_day(date), next_day_start(date)),
        (SplitCase::Tail, SplitAnchor::EventEnd) => {
            (start_of_day(last_day_of(start, end)), end)
        }
        (SplitCase::Middle, SplitAnchor::EventEnd) => {
            let end_day = last_day_of(start, end);
            (start_of_day(end_day), next_day_start(end_day))
        }
    };

    Some(ClippedEvent {
        source: event,
        start,
        end,
        case,
    })
}

/// Every calendar date the interval `[start, end)` touches, in order.
pub fn dates_touched(start: NaiveDateTime, end: NaiveDateTime) -> impl Iterator<Item = NaiveDate> {
    let last = last_day_of(start, end);
    start.date().iter_days().take_while(move |d| *d <= last)
}
