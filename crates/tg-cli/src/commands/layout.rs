//! Layout command for printing a calendar body.
//!
//! This module implements `tg layout`: events are read from a JSON array,
//! laid out over consecutive dates and printed per column (human-readable
//! or JSON).

use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tg_core::{
    BodyLayout, CalendarBody, CalendarEventBase, DayColumn, Event, LayoutConfig, SplitCase,
};

/// Reads a JSON array of events from `path`, or from stdin for `-`.
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read events from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };

    let events: Vec<Event> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse events from {}", path.display()))?;
    tracing::debug!(count = events.len(), "loaded events");
    Ok(events)
}

/// `days` consecutive dates starting at `start`.
pub fn date_range(start: NaiveDate, days: u32) -> Vec<NaiveDate> {
    start.iter_days().take(days as usize).collect()
}

/// `HH:MM-HH:MM`, with an end on a later midnight shown as `24:00`.
fn clock_range(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let end_label = if end > start && end.time() == NaiveTime::MIN {
        "24:00".to_string()
    } else {
        end.format("%H:%M").to_string()
    };
    format!("{}-{end_label}", start.format("%H:%M"))
}

fn write_column<W: Write, E: CalendarEventBase>(
    writer: &mut W,
    column: &DayColumn<'_, E>,
) -> std::io::Result<()> {
    writeln!(writer, "{} {}", column.key, column.date.format("%a"))?;

    if let Some(percent) = column.now_indicator {
        writeln!(writer, "  now {percent:.1}%")?;
    }

    if column.events.is_empty() {
        writeln!(writer, "  (no events)")?;
    }

    for block in &column.events {
        let event = &block.event;
        let suffix = match event.split {
            Some(SplitCase::Tail) => " (tail)",
            Some(SplitCase::Middle) => " (middle)",
            Some(SplitCase::SameDay) | None => "",
        };
        writeln!(
            writer,
            "  {}  top {:.1}% height {:.1}% rank {}/{}  {}{suffix}",
            clock_range(event.start, event.end),
            block.vertical.top_pct,
            block.vertical.height_pct,
            event.overlap_position + 1,
            event.overlap_count,
            event.title(),
        )?;
    }

    Ok(())
}

/// Writes one block per column in display order.
pub fn write_layout<W: Write, E: CalendarEventBase>(
    writer: &mut W,
    layout: &BodyLayout<'_, E>,
) -> std::io::Result<()> {
    for column in &layout.columns {
        write_column(writer, column)?;
    }
    Ok(())
}

/// Runs the layout command.
pub fn run<W: Write>(
    writer: &mut W,
    config: LayoutConfig,
    events: &[Event],
    dates: &[NaiveDate],
    now: Option<NaiveDateTime>,
    json: bool,
) -> Result<()> {
    let mut body = CalendarBody::new(config).context("invalid layout configuration")?;
    let layout = body.layout(events, dates, now);
    tracing::debug!(
        columns = layout.columns.len(),
        rows = layout.gridlines.len(),
        "laid out calendar body"
    );

    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&layout)?)?;
    } else {
        write_layout(writer, &layout)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use tg_core::{EnrichmentMode, SplitAnchor};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn fixture() -> Vec<Event> {
        vec![
            Event::parse("2025-01-13T09:00", "2025-01-13T10:00", "A").unwrap(),
            Event::parse("2025-01-13T09:30", "2025-01-13T10:30", "B").unwrap(),
            Event::parse("2025-01-13T22:00", "2025-01-15T02:00", "C").unwrap(),
        ]
    }

    fn render(config: LayoutConfig, json: bool) -> String {
        let events = fixture();
        let now = day(14).and_hms_opt(12, 0, 0);
        let mut output = Vec::new();
        run(
            &mut output,
            config,
            &events,
            &date_range(day(13), 3),
            now,
            json,
        )
        .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_date_range_is_consecutive() {
        assert_eq!(date_range(day(30), 3), vec![day(30), day(31), day(31).succ_opt().unwrap()]);
        assert!(date_range(day(1), 0).is_empty());
    }

    #[test]
    fn test_layout_text_output() {
        let output = render(LayoutConfig::default(), false);
        assert_snapshot!(output, @r"
        2025-01-13 Mon
          09:00-10:00  top 37.5% height 4.2% rank 1/2  A
          09:30-10:30  top 39.6% height 4.2% rank 2/2  B
          22:00-02:00  top 91.7% height 8.3% rank 1/1  C
        2025-01-14 Tue
          now 50.0%
          00:00-24:00  top 0.0% height 100.0% rank 1/1  C (middle)
        2025-01-15 Wed
          00:00-02:00  top 0.0% height 8.3% rank 1/1  C (tail)
        ");
    }

    #[test]
    fn test_layout_by_date_matches_flat() {
        let by_date = LayoutConfig {
            mode: EnrichmentMode::ByDate,
            ..LayoutConfig::default()
        };
        assert_eq!(
            render(by_date, false),
            render(LayoutConfig::default(), false)
        );
    }

    #[test]
    fn test_layout_empty_columns_are_marked() {
        let events: Vec<Event> = Vec::new();
        let mut output = Vec::new();
        run(
            &mut output,
            LayoutConfig::default(),
            &events,
            &[day(13)],
            None,
            false,
        )
        .unwrap();
        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        2025-01-13 Mon
          (no events)
        ");
    }

    #[test]
    fn test_layout_json_output() {
        let output = render(LayoutConfig::default(), true);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value["gridlines"].as_array().unwrap().len(), 24);
        assert_eq!(value["columnHeight"], 1440.0);
        assert_eq!(value["showHourGutter"], true);

        let monday = &value["columns"][0];
        assert_eq!(monday["key"], "2025-01-13");
        assert!(monday.get("nowIndicator").is_none());
        assert_eq!(
            monday["events"][0]["renderKey"],
            "02025-01-13T09:00:00A2025-01-13T10:00:00"
        );
        assert_eq!(monday["events"][1]["event"]["overlapPosition"], 1);
        assert_eq!(monday["events"][1]["event"]["overlapCount"], 2);
        assert_eq!(monday["events"][1]["horizontal"]["leftOffset"], 20.0);
        assert_eq!(monday["events"][1]["horizontal"]["zIndex"], 2);

        let tuesday = &value["columns"][1];
        assert_eq!(tuesday["nowIndicator"], 50.0);
        assert_eq!(tuesday["events"][0]["event"]["split"], "middle");
        assert_eq!(tuesday["events"][0]["event"]["event"]["title"], "C");
        // middle blocks sit on the bounds of the day the event ends
        assert_eq!(tuesday["events"][0]["event"]["start"], "2025-01-15T00:00:00");
        assert_eq!(tuesday["events"][0]["event"]["end"], "2025-01-16T00:00:00");
        assert_eq!(tuesday["events"][0]["vertical"]["heightPct"], 100.0);
    }

    #[test]
    fn test_layout_render_date_anchor() {
        let config = LayoutConfig {
            split_anchor: SplitAnchor::RenderDate,
            ..LayoutConfig::default()
        };
        let text = render(config.clone(), false);
        assert!(text.contains("  00:00-24:00  top 0.0% height 100.0% rank 1/1  C (middle)\n"));

        let value: serde_json::Value = serde_json::from_str(&render(config, true)).unwrap();
        let tuesday = &value["columns"][1];
        assert_eq!(tuesday["events"][0]["event"]["start"], "2025-01-14T00:00:00");
        assert_eq!(tuesday["events"][0]["event"]["end"], "2025-01-15T00:00:00");
    }

    #[test]
    fn test_clock_range_labels() {
        let at = |d: u32, h: u32| day(d).and_hms_opt(h, 0, 0).unwrap();
        assert_eq!(clock_range(at(13, 9), at(13, 10)), "09:00-10:00");
        assert_eq!(clock_range(at(13, 20), at(14, 0)), "20:00-24:00");
        assert_eq!(clock_range(at(15, 0), at(16, 0)), "00:00-24:00");
        assert_eq!(clock_range(at(13, 0), at(13, 0)), "00:00-00:00");
        assert_eq!(clock_range(at(13, 22), at(15, 2)), "22:00-02:00");
    }

    #[test]
    fn test_layout_rtl_reverses_columns() {
        let config = LayoutConfig {
            rtl: true,
            ..LayoutConfig::default()
        };
        let output = render(config, false);
        let headers: Vec<_> = output.lines().filter(|l| !l.starts_with(' ')).collect();
        assert_eq!(headers, vec!["2025-01-15 Wed", "2025-01-14 Tue", "2025-01-13 Mon"]);
    }

    #[test]
    fn test_load_events_keeps_passthrough_fields() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("events.json");
        std::fs::write(
            &path,
            r#"[{"start": "2025-01-13 09:00", "end": "2025-01-13T10:00:00", "title": "A", "room": "4F"}]"#,
        )
        .unwrap();

        let events = load_events(&path).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].extra["room"], "4F");
    }

    #[test]
    fn test_load_events_reports_bad_instants() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("events.json");
        std::fs::write(&path, r#"[{"start": "soon", "end": "2025-01-13T10:00"}]"#).unwrap();

        let err = load_events(&path).unwrap_err();
        assert!(format!("{err:#}").contains("invalid time value: soon"));
    }

    #[test]
    fn test_load_events_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_events(&temp.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
