//! Event layout engine for calendar time grids.
//!
//! This crate contains the types and logic for:
//! - Slots: the rows of a day column at a fixed minute step
//! - Overlap: stacking rank and peak concurrency within a column
//! - Splitting: clipping multi-day events to each date they touch
//! - Positioning: percentage offsets and horizontal stagger
//! - Body: assembling columns with memoized enrichment

pub mod body;
pub mod config;
pub mod enrich;
pub mod event;
pub mod now;
pub mod overlap;
pub mod position;
pub mod slots;
pub mod split;
pub mod types;

pub use body::{BodyLayout, CalendarBody, DayColumn, EventLayout};
pub use config::{EnrichmentMode, LayoutConfig};
pub use enrich::{
    BucketMap, EnrichOptions, enrich_by_date, enrich_by_date_with, enrich_column, enrich_dates,
    events_for,
};
pub use event::{CalendarEventBase, EnrichedEvent, Event};
pub use now::{Clock, FixedClock, NowTicker, SystemClock, is_today, now_indicator_percent};
pub use overlap::{Overlap, assign_overlaps, enrich_flat, overlaps};
pub use position::{
    HorizontalLayout, VerticalPosition, horizontal_layout_of, position_of, relative_top_in_day,
};
pub use slots::{Slots, TimeSlot, generate_slots};
pub use split::{ClippedEvent, SplitAnchor, SplitCase, split_for_date, split_for_date_with};
pub use types::{DateKey, LayoutError, parse_instant};
