//! Converting times to positions inside a day column.

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::event::{CalendarEventBase, span_of};

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Horizontal stagger between overlapping events, in pixels.
pub const DEFAULT_OVERLAP_OFFSET: f64 = 20.0;

/// Vertical placement as percentages of the column height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalPosition {
    pub top_pct: f64,
    pub height_pct: f64,
}

impl VerticalPosition {
    /// Cuts off whatever runs past the bottom of the column.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            top_pct: self.top_pct,
            height_pct: self.height_pct.min(100.0 - self.top_pct).max(0.0),
        }
    }

    /// Returns `(top, height)` in pixels for a column of the given height.
    pub fn to_pixels(self, column_height: f64) -> (f64, f64) {
        (
            self.top_pct / 100.0 * column_height,
            self.height_pct / 100.0 * column_height,
        )
    }
}

/// Horizontal placement of an event within its column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalLayout {
    /// Distance from the column's leading edge, in pixels.
    pub left_offset: f64,
    /// How much narrower than the column the block is, in pixels.
    pub width_reduction: f64,
    /// Later-ranked events draw above earlier ones.
    pub z_index: usize,
}

impl HorizontalLayout {
    /// Block width for a column of the given width.
    pub fn width_in(self, column_width: f64) -> f64 {
        (column_width - self.width_reduction).max(0.0)
    }
}

/// Minutes elapsed since midnight, ignoring seconds.
pub fn minutes_into_day(instant: NaiveDateTime) -> u32 {
    instant.hour() * 60 + instant.minute()
}

/// Percentage of the day elapsed at `instant`, in `[0, 100)`.
pub fn relative_top_in_day(instant: NaiveDateTime) -> f64 {
    f64::from(minutes_into_day(instant)) / f64::from(MINUTES_PER_DAY) * 100.0
}

/// Vertical placement of an (already clipped) event.
///
/// Zero-length and inverted events get zero height. The height is not
/// clamped to the column; see [`VerticalPosition::clamped`].
#[allow(clippy::cast_precision_loss)]
pub fn position_of<E: CalendarEventBase + ?Sized>(event: &E) -> VerticalPosition {
    let (start, end) = span_of(event);
    let minutes = (end - start).num_minutes();

    VerticalPosition {
        top_pct: relative_top_in_day(start),
        height_pct: minutes as f64 / f64::from(MINUTES_PER_DAY) * 100.0,
    }
}

/// Staggers an event by its overlap rank.
///
/// Each rank shifts the block one `offset` further from the leading edge and
/// narrows it by the same amount. Ranks past `count - 1` are treated as the
/// last rank.
#[allow(clippy::cast_precision_loss)]
pub fn horizontal_layout_of(rank: usize, count: usize, offset: f64) -> HorizontalLayout {
    let rank = rank.min(count.saturating_sub(1));
    let shift = rank as f64 * offset;

    HorizontalLayout {
        left_offset: shift,
        width_reduction: shift,
        z_index: rank + 1,
    }
}

/// Initial vertical scroll position for the body.
pub fn scroll_offset_px(cell_height: f64, minutes: u32) -> f64 {
    cell_height * f64::from(minutes) / 60.0
}
