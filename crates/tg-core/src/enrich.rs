//! Grouping events into date buckets with overlap metadata.
//!
//! Both enrichment modes produce a [`BucketMap`]:
//!
//! - by date: every event is split onto each date it touches, once, so a
//!   column lookup is a map access
//! - flat: only the visible dates are filled, each by scanning the full
//!   event list
//!
//! Within a bucket, overlaps are computed on the clipped bounds, so the two
//! modes give the same layout for any visible date.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::event::{CalendarEventBase, EnrichedEvent, span_of};
use crate::overlap::{Overlap, assign_overlaps};
use crate::split::{ClippedEvent, SplitAnchor, dates_touched, split_for_date_with};
use crate::types::DateKey;

/// Events intersecting each date, keyed by `YYYY-MM-DD`.
pub type BucketMap<'a, E> = BTreeMap<DateKey, Vec<EnrichedEvent<'a, E>>>;

/// Options that change enrichment output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnrichOptions {
    /// Events are already in ascending start order. A wrong hint never
    /// panics; it only leaves stacking ranks unspecified.
    pub sorted: bool,
    pub anchor: SplitAnchor,
    /// Compute stacking; when false every event is rank 0 of 1.
    pub ordering: bool,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            sorted: false,
            anchor: SplitAnchor::default(),
            ordering: true,
        }
    }
}

/// Buckets every event under each date it touches.
///
/// Absent dates have no events; an empty event list yields an empty map.
pub fn enrich_by_date<E: CalendarEventBase>(events: &[E], sorted: bool) -> BucketMap<'_, E> {
    enrich_by_date_with(
        events,
        EnrichOptions {
            sorted,
            ..EnrichOptions::default()
        },
    )
}

/// [`enrich_by_date`] with explicit options.
pub fn enrich_by_date_with<E: CalendarEventBase>(
    events: &[E],
    options: EnrichOptions,
) -> BucketMap<'_, E> {
    let mut buckets: BTreeMap<DateKey, Vec<ClippedEvent<'_, E>>> = BTreeMap::new();

    for event in events {
        let (start, end) = span_of(event);
        for date in dates_touched(start, end) {
            if let Some(clipped) = split_for_date_with(event, date, options.anchor) {
                buckets.entry(DateKey::new(date)).or_default().push(clipped);
            }
        }
    }

    tracing::debug!(
        events = events.len(),
        dates = buckets.len(),
        "bucketed events by date"
    );

    buckets
        .into_iter()
        .map(|(key, clipped)| {
            tracing::trace!(date = %key, events = clipped.len(), "enriching bucket");
            (key, enrich_clipped(&clipped, options))
        })
        .collect()
}

/// Enriches the events visible on one date by scanning the full list.
pub fn enrich_column<E: CalendarEventBase>(
    events: &[E],
    date: NaiveDate,
    options: EnrichOptions,
) -> Vec<EnrichedEvent<'_, E>> {
    let clipped: Vec<_> = events
        .iter()
        .filter_map(|event| split_for_date_with(event, date, options.anchor))
        .collect();
    enrich_clipped(&clipped, options)
}

/// Fills buckets for `dates` only, one full scan per date.
pub fn enrich_dates<'a, E: CalendarEventBase>(
    events: &'a [E],
    dates: &[NaiveDate],
    options: EnrichOptions,
) -> BucketMap<'a, E> {
    dates
        .iter()
        .map(|&date| (DateKey::new(date), enrich_column(events, date, options)))
        .collect()
}

/// Looks up one column's events; missing dates are empty.
pub fn events_for<'m, 'a, E>(
    buckets: &'m BucketMap<'a, E>,
    date: NaiveDate,
) -> &'m [EnrichedEvent<'a, E>] {
    buckets
        .get(&DateKey::new(date))
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn enrich_clipped<'a, E: CalendarEventBase>(
    clipped: &[ClippedEvent<'a, E>],
    options: EnrichOptions,
) -> Vec<EnrichedEvent<'a, E>> {
    let overlaps = if options.ordering {
        let spans: Vec<_> = clipped.iter().map(span_of).collect();
        // Clipping to the render date keeps sorted input sorted; anchoring on
        // the end day does not.
        let sorted = options.sorted && options.anchor == SplitAnchor::RenderDate;
        assign_overlaps(&spans, sorted)
    } else {
        vec![Overlap::ALONE; clipped.len()]
    };

    clipped
        .iter()
        .zip(overlaps)
        .map(|(c, overlap)| EnrichedEvent {
            source: c.source,
            start: c.start,
            end: c.end,
            overlap_position: overlap.position,
            overlap_count: overlap.count,
            split: Some(c.case),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use chrono::NaiveDateTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        day(d).and_hms_opt(h, m, 0).unwrap()
    }

    type Summary = Vec<(String, NaiveDateTime, NaiveDateTime, usize, usize)>;

    fn summary(events: &[EnrichedEvent<'_, Event>]) -> Summary {
        events
            .iter()
            .map(|e| {
                (
                    e.source.title.clone(),
                    e.start,
                    e.end,
                    e.overlap_position,
                    e.overlap_count,
                )
            })
            .collect()
    }

    fn week() -> Vec<Event> {
        vec![
            Event::new(at(13, 9, 0), at(13, 10, 0), "A"),
            Event::new(at(13, 9, 30), at(13, 10, 30), "B"),
            Event::new(at(13, 22, 0), at(15, 2, 0), "C"),
            Event::new(at(14, 1, 0), at(14, 3, 0), "D"),
            Event::new(at(15, 1, 0), at(15, 1, 30), "E"),
            Event::new(at(17, 12, 0), at(17, 12, 0), "zero"),
        ]
    }

    #[test]
    fn buckets_span_every_touched_date() {
        let events = week();
        let buckets = enrich_by_date(&events, false);
        let keys: Vec<_> = buckets.keys().map(ToString::to_string).collect();
        assert_eq!(
            keys,
            vec!["2025-01-13", "2025-01-14", "2025-01-15", "2025-01-17"]
        );
    }

    #[test]
    fn multi_day_event_is_clipped_per_bucket() {
        let events = week();
        let buckets = enrich_by_date(&events, false);

        // C's middle block sits on Wednesday's bounds, clear of D.
        let tue = summary(events_for(&buckets, day(14)));
        assert_eq!(
            tue,
            vec![
                ("C".to_string(), at(15, 0, 0), at(16, 0, 0), 0, 1),
                ("D".to_string(), at(14, 1, 0), at(14, 3, 0), 0, 1),
            ]
        );

        let wed = summary(events_for(&buckets, day(15)));
        assert_eq!(
            wed,
            vec![
                ("C".to_string(), at(15, 0, 0), at(15, 2, 0), 0, 2),
                ("E".to_string(), at(15, 1, 0), at(15, 1, 30), 1, 2),
            ]
        );
    }

    #[test]
    fn render_date_anchor_stacks_middle_day() {
        let events = week();
        let options = EnrichOptions {
            anchor: SplitAnchor::RenderDate,
            ..EnrichOptions::default()
        };
        let buckets = enrich_by_date_with(&events, options);

        let tue = summary(events_for(&buckets, day(14)));
        assert_eq!(
            tue,
            vec![
                ("C".to_string(), at(14, 0, 0), at(15, 0, 0), 0, 2),
                ("D".to_string(), at(14, 1, 0), at(14, 3, 0), 1, 2),
            ]
        );

        let flat = enrich_dates(&events, &[day(14)], options);
        assert_eq!(events_for(&flat, day(14)), events_for(&buckets, day(14)));
    }

    #[test]
    fn overlap_is_scoped_to_the_bucket() {
        let events = week();
        let buckets = enrich_by_date(&events, false);

        // Monday: A and B stack; C starts later and stands alone that day.
        let mon = summary(events_for(&buckets, day(13)));
        assert_eq!((mon[0].3, mon[0].4), (0, 2));
        assert_eq!((mon[1].3, mon[1].4), (1, 2));
        assert_eq!((mon[2].3, mon[2].4), (0, 1));
    }

    #[test]
    fn both_modes_agree_on_visible_dates() {
        let events = week();
        let dates: Vec<_> = (12..=18).map(day).collect();
        let by_date = enrich_by_date(&events, false);
        let flat = enrich_dates(&events, &dates, EnrichOptions::default());

        for date in &dates {
            assert_eq!(
                events_for(&by_date, *date),
                events_for(&flat, *date),
                "mismatch on {date}"
            );
        }
    }

    #[test]
    fn both_modes_agree_with_sorted_hint() {
        let events = week();
        for anchor in [SplitAnchor::EventEnd, SplitAnchor::RenderDate] {
            let options = EnrichOptions {
                anchor,
                ..EnrichOptions::default()
            };
            let hinted = enrich_by_date_with(
                &events,
                EnrichOptions {
                    sorted: true,
                    ..options
                },
            );
            let unsorted = enrich_by_date_with(&events, options);
            assert_eq!(hinted, unsorted, "mismatch with {anchor:?}");
        }
    }

    #[test]
    fn ordering_disabled_stacks_nothing() {
        let events = week();
        let options = EnrichOptions {
            ordering: false,
            ..EnrichOptions::default()
        };
        let column = enrich_column(&events, day(13), options);
        assert_eq!(column.len(), 3);
        assert!(
            column
                .iter()
                .all(|e| e.overlap_position == 0 && e.overlap_count == 1)
        );
    }

    #[test]
    fn event_end_anchor_sorts_within_bucket() {
        let events = vec![
            Event::new(at(13, 8, 0), at(15, 12, 0), "long"),
            Event::new(at(14, 9, 0), at(14, 10, 0), "meeting"),
        ];
        let options = EnrichOptions {
            sorted: true,
            anchor: SplitAnchor::EventEnd,
            ordering: true,
        };
        let column = enrich_column(&events, day(14), options);
        // "long" is drawn on Wednesday's bounds and no longer meets "meeting"
        assert_eq!(column[0].start, at(15, 0, 0));
        assert_eq!((column[1].overlap_position, column[1].overlap_count), (0, 1));
    }

    #[test]
    fn empty_events_give_empty_buckets() {
        let events: Vec<Event> = Vec::new();
        assert!(enrich_by_date(&events, false).is_empty());
        let flat = enrich_dates(&events, &[day(13)], EnrichOptions::default());
        assert!(events_for(&flat, day(13)).is_empty());
        assert!(events_for(&flat, day(20)).is_empty());
    }

    #[test]
    fn buckets_record_split_case() {
        use crate::split::SplitCase;

        let events = week();
        let buckets = enrich_by_date(&events, false);
        let case_of = |d: u32| {
            events_for(&buckets, day(d))
                .iter()
                .find(|e| e.source.title == "C")
                .and_then(|e| e.split)
        };
        assert_eq!(case_of(13), Some(SplitCase::SameDay));
        assert_eq!(case_of(14), Some(SplitCase::Middle));
        assert_eq!(case_of(15), Some(SplitCase::Tail));
    }

    #[test]
    fn sources_are_borrowed_not_copied() {
        let events = week();
        let buckets = enrich_by_date(&events, false);
        let tue = events_for(&buckets, day(14));
        assert!(std::ptr::eq(tue[0].source, &events[2]));
        assert_eq!(events[2].start, at(13, 22, 0));
    }
}
