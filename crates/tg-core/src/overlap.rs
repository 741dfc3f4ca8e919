//! Overlap clustering.
//!
//! # Algorithm Summary
//!
//! 1. Order intervals by start (stable, so ties keep input order)
//! 2. Sweep, keeping the set of intervals still active at the current start
//! 3. An interval's rank is the number of active intervals it joins
//! 4. When the active set drains, the cluster closes; every member gets the
//!    cluster's peak concurrency as its count
//!
//! Overlap is the half-open test `a.start < b.end && b.start < a.end`, and
//! clusters are its transitive closure: A-B and B-C put A, B and C in one
//! cluster even if A and C never meet.
//!
//! A zero-length interval at `t` only meets intervals that started before
//! `t` and are still running. It never stays active, so nothing after it in
//! the sweep can meet it; when it meets nothing it is alone.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::{CalendarEventBase, EnrichedEvent, span_of};

/// Stacking metadata for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlap {
    /// 0-based rank among the events overlapping this one, by start time.
    pub position: usize,
    /// Peak number of simultaneously active events in the cluster.
    pub count: usize,
}

impl Overlap {
    /// Metadata for an event that stacks with nothing.
    pub const ALONE: Self = Self {
        position: 0,
        count: 1,
    };
}

/// Returns true if two half-open intervals intersect.
pub fn overlaps(a: (NaiveDateTime, NaiveDateTime), b: (NaiveDateTime, NaiveDateTime)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

/// Computes overlap metadata for each interval, returned in input order.
///
/// Intervals must have `end >= start`. When `sorted` is true the input is
/// trusted to already be in ascending start order and is not re-sorted; if
/// it is not, ranks and counts are unspecified but every interval still gets
/// an entry.
pub fn assign_overlaps(spans: &[(NaiveDateTime, NaiveDateTime)], sorted: bool) -> Vec<Overlap> {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    if !sorted {
        order.sort_by_key(|&i| spans[i].0);
    }

    let mut result = vec![Overlap::ALONE; spans.len()];
    let mut active: Vec<usize> = Vec::new();
    let mut cluster: Vec<usize> = Vec::new();
    let mut peak = 0;

    for &i in &order {
        let (start, end) = spans[i];
        active.retain(|&j| spans[j].1 > start);

        if active.is_empty() {
            close_cluster(&mut result, &mut cluster, peak);
            peak = 0;
        }

        if start == end {
            let met = active.iter().filter(|&&j| spans[j].0 < start).count();
            if met > 0 {
                result[i].position = met;
                cluster.push(i);
                peak = peak.max(met + 1);
            }
            continue;
        }

        result[i].position = active.len();
        active.push(i);
        cluster.push(i);
        peak = peak.max(active.len());
    }
    close_cluster(&mut result, &mut cluster, peak);

    result
}

fn close_cluster(result: &mut [Overlap], cluster: &mut Vec<usize>, peak: usize) {
    for i in cluster.drain(..) {
        result[i].count = peak;
    }
}

/// Attaches overlap metadata to every event, keeping input order.
///
/// Bounds are the events' own; nothing is clipped. An empty slice yields an
/// empty result.
pub fn enrich_flat<E: CalendarEventBase>(events: &[E], sorted: bool) -> Vec<EnrichedEvent<'_, E>> {
    let spans: Vec<_> = events.iter().map(span_of).collect();
    let overlaps = assign_overlaps(&spans, sorted);

    events
        .iter()
        .zip(overlaps)
        .map(|(event, overlap)| EnrichedEvent {
            source: event,
            start: event.start(),
            end: event.end(),
            overlap_position: overlap.position,
            overlap_count: overlap.count,
            split: None,
        })
        .collect()
}
