//! Check command: shows how each record normalizes against a day.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDateTime;
use clap::Args;

use dt_core::{DomainEvent, day_start_of, normalize_event};

use super::input::InputArgs;
use super::util::{format_minute, plural};
use crate::Config;

/// Arguments for `dt check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Writes one line per record, then the totals.
pub fn write_check<W: Write>(
    writer: &mut W,
    events: &[DomainEvent],
    day_start: NaiveDateTime,
) -> std::io::Result<()> {
    writeln!(writer, "CHECK: {}", day_start.format("%A, %b %-d, %Y"))?;

    let mut placed = 0;
    for event in events {
        let status = match normalize_event(event, day_start) {
            Ok(interval) => {
                placed += 1;
                format!(
                    "{}-{}",
                    format_minute(interval.start_minute),
                    format_minute(interval.end_minute)
                )
            }
            Err(reason) => format!("skipped: {reason}"),
        };
        writeln!(
            writer,
            "  {:<12} {:<12} {status}",
            event.id.as_str(),
            event.kind.as_str()
        )?;
    }

    let skipped = events.len() - placed;
    writeln!(
        writer,
        "{placed} {} placed, {skipped} skipped",
        plural(placed, "record", "records")
    )?;
    Ok(())
}

/// Runs the check command.
pub fn run<W: Write>(writer: &mut W, args: &CheckArgs, config: &Config) -> Result<()> {
    let date = args.input.date()?;
    let events = args.input.read_events(config)?;
    write_check(writer, &events, day_start_of(date))?;
    Ok(())
}
