//! Layout configuration.

use serde::{Deserialize, Serialize};

use crate::position::DEFAULT_OVERLAP_OFFSET;
use crate::slots::DEFAULT_STEP_MINUTES;
use crate::split::SplitAnchor;
use crate::types::LayoutError;

/// How events are grouped into date columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    /// Scan the full event list for every visible column.
    #[default]
    Flat,
    /// Bucket events by date once, then look columns up by key.
    ByDate,
}

/// Configuration for laying out a calendar body.
///
/// Only `mode`, `event_ordering`, `events_are_sorted` and `split_anchor`
/// affect enrichment; the rest are presentation values that can change
/// without recomputing overlaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Grid row height in minutes.
    pub minute_step: u32,

    /// Pixel height of one grid row.
    pub cell_height: f64,

    /// Horizontal stagger per overlap rank, in pixels.
    pub overlap_offset: f64,

    /// Minutes into the day the body is initially scrolled to.
    pub scroll_offset_minutes: u32,

    pub mode: EnrichmentMode,

    /// When false, flat mode stacks nothing (every event gets rank 0 of 1).
    pub event_ordering: bool,

    /// Caller guarantees events are in ascending start order; stacking is
    /// unspecified (but never fails) when that does not hold.
    pub events_are_sorted: bool,

    pub split_anchor: SplitAnchor,

    pub show_now_indicator: bool,

    pub hide_hours: bool,

    pub show_week_number: bool,

    /// Emit columns right-to-left.
    pub rtl: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            minute_step: DEFAULT_STEP_MINUTES,
            cell_height: 60.0,
            overlap_offset: DEFAULT_OVERLAP_OFFSET,
            scroll_offset_minutes: 0,
            mode: EnrichmentMode::Flat,
            event_ordering: true,
            events_are_sorted: false,
            split_anchor: SplitAnchor::EventEnd,
            show_now_indicator: true,
            hide_hours: false,
            show_week_number: false,
            rtl: false,
        }
    }
}

impl LayoutConfig {
    /// Checks values the layout cannot work with.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.minute_step == 0 {
            return Err(LayoutError::InvalidStep {
                step: self.minute_step,
            });
        }
        Ok(())
    }

    /// Whether the hour gutter is drawn.
    pub const fn show_hour_gutter(&self) -> bool {
        !self.hide_hours || self.show_week_number
    }
}
