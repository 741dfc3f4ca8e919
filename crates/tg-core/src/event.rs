//! Calendar events and their enriched layout records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::split::SplitCase;
use crate::types::{LayoutError, parse_instant};

/// An event that can be laid out on the time grid.
///
/// This trait lets the engine work with host event types directly
/// (e.g., [`Event`] parsed from JSON, or test fixtures) without copying them.
/// Events carry no stable id; the combination of start, end and title
/// identifies one.
pub trait CalendarEventBase {
    /// When the event starts.
    fn start(&self) -> NaiveDateTime;

    /// When the event ends. Values before `start` lay out as zero-length.
    fn end(&self) -> NaiveDateTime;

    /// The event's display title.
    fn title(&self) -> &str;
}

/// Returns the event's half-open interval with `end` raised to at least `start`.
pub(crate) fn span_of<E: CalendarEventBase + ?Sized>(
    event: &E,
) -> (NaiveDateTime, NaiveDateTime) {
    let start = event.start();
    (start, event.end().max(start))
}

/// A calendar event supplied by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
    /// Caller-defined fields, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Event {
    /// Creates an event with no passthrough fields.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, title: impl Into<String>) -> Self {
        Self {
            start,
            end,
            title: title.into(),
            extra: serde_json::Map::new(),
        }
    }

    /// Creates an event from textual instants.
    pub fn parse(start: &str, end: &str, title: impl Into<String>) -> Result<Self, LayoutError> {
        Ok(Self::new(parse_instant(start)?, parse_instant(end)?, title))
    }
}

impl CalendarEventBase for Event {
    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Wire shape of an event before its instants are validated.
#[derive(Deserialize)]
struct RawEvent {
    start: String,
    end: String,
    #[serde(default)]
    title: String,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl TryFrom<RawEvent> for Event {
    type Error = LayoutError;

    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let mut event = Self::parse(&raw.start, &raw.end, raw.title)?;
        event.extra = raw.extra;
        Ok(event)
    }
}

/// An event positioned for one date column, with overlap metadata.
///
/// The original event is borrowed, never modified; `start` and `end` are the
/// bounds used for layout (clipped to the column for multi-day events).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent<'a, E> {
    /// The event as supplied by the caller.
    #[serde(rename = "event")]
    pub source: &'a E,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// 0-based stacking rank among the events overlapping this one.
    pub overlap_position: usize,
    /// Peak concurrency of the overlap cluster this event belongs to.
    pub overlap_count: usize,
    /// How the event was split onto its column; `None` for unsplit events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split: Option<SplitCase>,
}

impl<E> Clone for EnrichedEvent<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EnrichedEvent<'_, E> {}

impl<E> PartialEq for EnrichedEvent<'_, E> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.source, other.source)
            && self.start == other.start
            && self.end == other.end
            && self.overlap_position == other.overlap_position
            && self.overlap_count == other.overlap_count
            && self.split == other.split
    }
}

impl<E: CalendarEventBase> EnrichedEvent<'_, E> {
    /// Key that stays stable across renders for the same event in the same slot.
    pub fn render_key(&self, index: usize) -> String {
        format!(
            "{index}{}{}{}",
            self.start.format("%Y-%m-%dT%H:%M:%S"),
            self.source.title(),
            self.end.format("%Y-%m-%dT%H:%M:%S")
        )
    }
}

impl<E: CalendarEventBase> CalendarEventBase for EnrichedEvent<'_, E> {
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
