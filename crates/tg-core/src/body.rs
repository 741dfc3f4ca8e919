//! Calendar body layout.
//!
//! Combines the grid rows, enrichment and position calculations into one
//! [`BodyLayout`] per render. Enrichment is the expensive part and is
//! memoized on exactly the inputs that affect it: the event slice, the date
//! range and the enrichment flags. Presentation values such as cell height
//! or overlap offset never trigger it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::{EnrichmentMode, LayoutConfig};
use crate::enrich::{BucketMap, EnrichOptions, enrich_by_date_with, enrich_dates, events_for};
use crate::event::{CalendarEventBase, EnrichedEvent};
use crate::now::{is_today, now_indicator_percent};
use crate::position::{
    HorizontalLayout, VerticalPosition, horizontal_layout_of, position_of, scroll_offset_px,
};
use crate::slots::{Slots, TimeSlot, generate_slots};
use crate::types::{DateKey, LayoutError};

/// Layout of the whole body for one render.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyLayout<'a, E> {
    /// Row starts, shared by the hour gutter and every column.
    pub gridlines: Vec<TimeSlot>,
    pub show_hour_gutter: bool,
    /// Pixel height of a full day column.
    pub column_height: f64,
    /// Initial vertical scroll position, in pixels.
    pub scroll_offset: f64,
    /// Columns in display order.
    pub columns: Vec<DayColumn<'a, E>>,
}

/// One date column.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayColumn<'a, E> {
    pub date: NaiveDate,
    pub key: DateKey,
    pub events: Vec<EventLayout<'a, E>>,
    /// Percentage down the column for the now line, only on today's column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub now_indicator: Option<f64>,
}

/// A positioned event block.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLayout<'a, E> {
    pub render_key: String,
    pub event: EnrichedEvent<'a, E>,
    pub vertical: VerticalPosition,
    pub horizontal: HorizontalLayout,
}

/// Everything enrichment output depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EnrichmentKey {
    /// Address and length of the event slice.
    events: (usize, usize),
    dates: Vec<NaiveDate>,
    mode: EnrichmentMode,
    options: EnrichOptions,
}

impl EnrichmentKey {
    fn new<E>(events: &[E], dates: &[NaiveDate], config: &LayoutConfig) -> Self {
        Self {
            events: (events.as_ptr().addr(), events.len()),
            dates: dates.to_vec(),
            mode: config.mode,
            options: enrich_options(config),
        }
    }
}

fn enrich_options(config: &LayoutConfig) -> EnrichOptions {
    EnrichOptions {
        sorted: config.events_are_sorted,
        anchor: config.split_anchor,
        // by-date buckets always stack
        ordering: config.mode == EnrichmentMode::ByDate || config.event_ordering,
    }
}

struct Enriched<'a, E> {
    key: EnrichmentKey,
    buckets: BucketMap<'a, E>,
}

/// Lays out a calendar body, reusing enrichment across renders.
pub struct CalendarBody<'a, E> {
    config: LayoutConfig,
    slots: Slots,
    cache: Option<Enriched<'a, E>>,
    runs: usize,
}

impl<'a, E: CalendarEventBase> CalendarBody<'a, E> {
    /// Creates a body after validating `config`.
    pub fn new(config: LayoutConfig) -> Result<Self, LayoutError> {
        let slots = generate_slots(config.minute_step)?;
        Ok(Self {
            config,
            slots,
            cache: None,
            runs: 0,
        })
    }

    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// Cached enrichment survives unless an enrichment flag changed.
    pub fn set_config(&mut self, config: LayoutConfig) -> Result<(), LayoutError> {
        self.slots = generate_slots(config.minute_step)?;
        self.config = config;
        Ok(())
    }

    /// How many times enrichment has been computed.
    pub const fn enrichment_runs(&self) -> usize {
        self.runs
    }

    /// Lays out `events` over `dates`.
    ///
    /// `now` places the now line on today's column; pass `None` (or disable
    /// `show_now_indicator`) to omit it.
    pub fn layout(
        &mut self,
        events: &'a [E],
        dates: &[NaiveDate],
        now: Option<NaiveDateTime>,
    ) -> BodyLayout<'a, E> {
        let key = EnrichmentKey::new(events, dates, &self.config);

        let cached = match self.cache.take() {
            Some(cached) if cached.key == key => cached,
            _ => Enriched {
                buckets: self.enrich(events, dates, &key),
                key,
            },
        };

        let layout = self.assemble(&cached.buckets, dates, now);
        self.cache = Some(cached);
        layout
    }

    /// Lays out `dates` from a bucket map the caller already holds.
    ///
    /// Nothing is enriched or cached.
    pub fn layout_with_buckets(
        &self,
        buckets: &BucketMap<'a, E>,
        dates: &[NaiveDate],
        now: Option<NaiveDateTime>,
    ) -> BodyLayout<'a, E> {
        self.assemble(buckets, dates, now)
    }

    fn enrich(
        &mut self,
        events: &'a [E],
        dates: &[NaiveDate],
        key: &EnrichmentKey,
    ) -> BucketMap<'a, E> {
        self.runs += 1;
        tracing::debug!(
            mode = ?key.mode,
            events = events.len(),
            dates = dates.len(),
            run = self.runs,
            "recomputing enrichment"
        );

        match key.mode {
            EnrichmentMode::ByDate => enrich_by_date_with(events, key.options),
            EnrichmentMode::Flat => enrich_dates(events, dates, key.options),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn assemble(
        &self,
        buckets: &BucketMap<'a, E>,
        dates: &[NaiveDate],
        now: Option<NaiveDateTime>,
    ) -> BodyLayout<'a, E> {
        let gridlines: Vec<_> = self.slots.restart().collect();
        let now = now.filter(|_| self.config.show_now_indicator);

        let mut columns: Vec<_> = dates
            .iter()
            .map(|&date| self.column(buckets, date, now))
            .collect();
        if self.config.rtl {
            columns.reverse();
        }

        BodyLayout {
            column_height: self.config.cell_height * gridlines.len() as f64,
            scroll_offset: scroll_offset_px(
                self.config.cell_height,
                self.config.scroll_offset_minutes,
            ),
            show_hour_gutter: self.config.show_hour_gutter(),
            gridlines,
            columns,
        }
    }

    fn column(
        &self,
        buckets: &BucketMap<'a, E>,
        date: NaiveDate,
        now: Option<NaiveDateTime>,
    ) -> DayColumn<'a, E> {
        let events = events_for(buckets, date)
            .iter()
            .enumerate()
            .map(|(index, event)| EventLayout {
                render_key: event.render_key(index),
                vertical: position_of(event).clamped(),
                horizontal: horizontal_layout_of(
                    event.overlap_position,
                    event.overlap_count,
                    self.config.overlap_offset,
                ),
                event: *event,
            })
            .collect();

        DayColumn {
            date,
            key: DateKey::new(date),
            events,
            now_indicator: now
                .filter(|now| is_today(date, *now))
                .map(now_indicator_percent),
        }
    }
}
