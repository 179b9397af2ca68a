//! Layout command for placing records on one or more days.
//!
//! This module implements `dt layout` with text and JSON output. Each day is
//! an independent engine call, so multi-day ranges are laid out in parallel.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use clap::Args;
use rayon::prelude::*;
use serde::Serialize;

use dt_core::{DayLayout, DomainEvent, LayoutOptions, day_start_of, layout_day};

use super::input::InputArgs;
use super::util::{format_minute, plural};
use crate::Config;

/// Arguments for `dt layout`.
#[derive(Debug, Args)]
pub struct LayoutArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Number of consecutive days to lay out, starting at `--date`.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=366))]
    pub days: u32,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,

    /// Width taken off each lane, in percent. Overrides the config.
    #[arg(long)]
    pub gutter: Option<f64>,

    /// Smallest rendered height, in percent of the day. Overrides the config.
    #[arg(long)]
    pub min_height: Option<f64>,
}

/// One laid-out day.
#[derive(Debug, Serialize)]
pub struct DayResult<'a> {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub layout: DayLayout<'a, DomainEvent>,
}

// ========== Layout ==========

/// Returns `count` consecutive dates starting at `start`.
fn date_range(start: NaiveDate, count: u32) -> Result<Vec<NaiveDate>> {
    (0..count)
        .map(|offset| {
            start
                .checked_add_days(Days::new(u64::from(offset)))
                .with_context(|| format!("date out of range: {start} + {offset} days"))
        })
        .collect()
}

/// Lays out every date against the same records, in date order.
pub fn layout_days<'a>(
    events: &'a [DomainEvent],
    dates: &[NaiveDate],
    options: &LayoutOptions,
) -> Vec<DayResult<'a>> {
    dates
        .par_iter()
        .map(|&date| DayResult {
            date,
            layout: layout_day(events, day_start_of(date), options),
        })
        .collect()
}

// ========== Formatting ==========

/// Writes the human-readable table for each day.
pub fn write_layout<W: Write>(writer: &mut W, days: &[DayResult<'_>]) -> std::io::Result<()> {
    for (idx, day) in days.iter().enumerate() {
        if idx > 0 {
            writeln!(writer)?;
        }
        write_day(writer, day)?;
    }
    Ok(())
}

fn write_day<W: Write>(writer: &mut W, day: &DayResult<'_>) -> std::io::Result<()> {
    let layout = &day.layout;
    writeln!(writer, "DAY LAYOUT: {}", day.date.format("%A, %b %-d, %Y"))?;

    if layout.entries.is_empty() {
        writeln!(writer, "No records on this day.")?;
        return Ok(());
    }

    let entries = layout.entries.len();
    let clusters = layout.clusters.len();
    writeln!(
        writer,
        "{entries} {} in {clusters} {}",
        plural(entries, "entry", "entries"),
        plural(clusters, "cluster", "clusters"),
    )?;

    // Entries come back cluster by cluster, so each summary owns the next
    // `size` entries.
    let mut rest = layout.entries.as_slice();
    for cluster in &layout.clusters {
        let (members, tail) = rest.split_at(cluster.size.min(rest.len()));
        rest = tail;

        writeln!(writer)?;
        writeln!(
            writer,
            "{}-{}  {} {}",
            format_minute(cluster.start_minute),
            format_minute(cluster.end_minute),
            cluster.lane_count,
            plural(cluster.lane_count, "lane", "lanes"),
        )?;
        for entry in members {
            let g = &entry.geometry;
            writeln!(
                writer,
                "  {:<12} {}-{}  lane {}  top {:>6.2}  height {:>6.2}  left {:>6.2}  width {:>6.2}",
                entry.id,
                format_minute(entry.start_minute),
                format_minute(entry.end_minute),
                entry.lane,
                g.top,
                g.height,
                g.left,
                g.width,
            )?;
        }
    }
    Ok(())
}

/// Formats the days as pretty JSON, one object per day.
pub fn format_layout_json(days: &[DayResult<'_>]) -> Result<String> {
    Ok(serde_json::to_string_pretty(days)?)
}

// ========== Public Interface ==========

/// Runs the layout command.
pub fn run<W: Write>(writer: &mut W, args: &LayoutArgs, config: &Config) -> Result<()> {
    let options = config
        .layout_options(args.min_height, args.gutter)
        .context("invalid layout options")?;
    let start = args.input.date()?;
    let dates = date_range(start, args.days)?;
    let events = args.input.read_events(config)?;

    let days = layout_days(&events, &dates, &options);

    if args.json {
        writeln!(writer, "{}", format_layout_json(&days)?)?;
    } else {
        write_layout(writer, &days)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDateTime;
    use dt_core::{EventId, MIN_HEIGHT_PERCENT, RecordKind};
    use insta::assert_snapshot;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 29).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        day.and_hms_opt(h, m, 0).unwrap()
    }

    fn activity(id: &str, h: u32, m: u32, minutes: f64) -> DomainEvent {
        let mut event = DomainEvent::new(EventId::new(id).unwrap(), RecordKind::Activity);
        event.timestamp = Some(at(date(), h, m));
        event.duration_minutes = Some(minutes);
        event
    }

    fn scenario() -> Vec<DomainEvent> {
        vec![
            activity("one", 9, 0, 30.0),
            activity("two", 9, 15, 30.0),
            activity("three", 10, 0, 15.0),
        ]
    }

    fn render(days: &[DayResult<'_>]) -> String {
        let mut out = Vec::new();
        write_layout(&mut out, days).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ========== Date Range Tests ==========

    #[test]
    fn date_range_is_consecutive() {
        let dates = date_range(date(), 3).unwrap();
        assert_eq!(
            dates,
            vec![
                date(),
                NaiveDate::from_ymd_opt(2025, 1, 30).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            ]
        );
    }

    #[test]
    fn date_range_rejects_overflow() {
        assert!(date_range(NaiveDate::MAX, 2).is_err());
    }

    // ========== Text Output Tests ==========

    #[test]
    fn text_output_for_scenario() {
        let events = scenario();
        let days = layout_days(&events, &[date()], &LayoutOptions::default());

        assert_snapshot!(render(&days), @r"
        DAY LAYOUT: Wednesday, Jan 29, 2025
        3 entries in 2 clusters

        09:00-09:45  2 lanes
          one          09:00-09:30  lane 0  top  37.50  height   2.08  left   0.00  width  50.00
          two          09:15-09:45  lane 1  top  38.54  height   2.08  left  50.00  width  50.00

        10:00-10:15  1 lane
          three        10:00-10:15  lane 0  top  41.67  height   2.08  left   0.00  width 100.00
        ");
    }

    #[test]
    fn text_output_applies_gutter() {
        let events = scenario();
        let options = LayoutOptions::new(MIN_HEIGHT_PERCENT, 0.5).unwrap();
        let days = layout_days(&events, &[date()], &options);

        let output = render(&days);
        assert!(output.contains("left   0.00  width  49.50"));
        assert!(output.contains("left  50.00  width  49.50"));
        assert!(output.contains("left   0.00  width  99.50"));
    }

    #[test]
    fn text_output_for_empty_day() {
        let events = scenario();
        let next_day = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        let days = layout_days(&events, &[next_day], &LayoutOptions::default());

        assert_snapshot!(render(&days), @r"
        DAY LAYOUT: Thursday, Jan 30, 2025
        No records on this day.
        ");
    }

    #[test]
    fn sleep_shows_on_both_days() {
        let mut sleep = DomainEvent::new(EventId::new("night").unwrap(), RecordKind::Sleep);
        sleep.timestamp = Some(at(date(), 23, 0));
        sleep.duration_hours = Some(8.0);
        let events = vec![sleep];
        let dates = date_range(date(), 2).unwrap();

        let days = layout_days(&events, &dates, &LayoutOptions::default());

        assert_snapshot!(render(&days), @r"
        DAY LAYOUT: Wednesday, Jan 29, 2025
        1 entry in 1 cluster

        23:00-24:00  1 lane
          night        23:00-24:00  lane 0  top  95.83  height   4.17  left   0.00  width 100.00

        DAY LAYOUT: Thursday, Jan 30, 2025
        1 entry in 1 cluster

        00:00-07:00  1 lane
          night        00:00-07:00  lane 0  top   0.00  height  29.17  left   0.00  width 100.00
        ");
    }

    // ========== JSON Output Tests ==========

    #[test]
    fn json_output_has_one_object_per_day() {
        let events = scenario();
        let dates = date_range(date(), 2).unwrap();
        let days = layout_days(&events, &dates, &LayoutOptions::default());

        let json: serde_json::Value =
            serde_json::from_str(&format_layout_json(&days).unwrap()).unwrap();
        let days = json.as_array().unwrap();
        assert_eq!(days.len(), 2);

        assert_eq!(days[0]["date"], "2025-01-29");
        assert_eq!(days[0]["entries"].as_array().unwrap().len(), 3);
        assert_eq!(days[0]["clusters"].as_array().unwrap().len(), 2);
        assert_eq!(days[0]["skipped"], 0);

        assert_eq!(days[1]["date"], "2025-01-30");
        assert!(days[1]["entries"].as_array().unwrap().is_empty());
        assert_eq!(days[1]["skipped"], 3);
    }

    #[test]
    fn json_entries_carry_geometry_and_payload() {
        let mut events = scenario();
        events[0]
            .extra
            .insert("note".into(), serde_json::json!("standup"));
        let days = layout_days(&events, &[date()], &LayoutOptions::default());

        let json: serde_json::Value =
            serde_json::from_str(&format_layout_json(&days).unwrap()).unwrap();
        let first = &json[0]["entries"][0];
        assert_eq!(first["id"], "one");
        assert_eq!(first["lane"], 0);
        assert_eq!(first["lane_count"], 2);
        assert_eq!(first["top"], 37.5);
        assert_eq!(first["width"], 50.0);
        assert_eq!(first["payload"]["kind"], "activity");
        assert_eq!(first["payload"]["note"], "standup");
    }
}
