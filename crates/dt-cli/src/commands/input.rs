//! Reading day records from a JSON-lines file or stdin.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Args;

use dt_core::DomainEvent;

use super::util::parse_date;
use crate::Config;

/// Where records come from and which day to show.
#[derive(Debug, Args)]
pub struct InputArgs {
    /// JSON-lines file of records (`-` for stdin). Defaults to `events_path`
    /// from the config.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Day to lay out: YYYY-MM-DD, today, yesterday, or "N days ago".
    #[arg(short, long, default_value = "today")]
    pub date: String,
}

impl InputArgs {
    /// Resolves the requested date against the local calendar.
    pub fn date(&self) -> Result<NaiveDate> {
        parse_date(&self.date, Local::now().date_naive())
    }

    /// Reads the records from `--input`, falling back to the configured path.
    pub fn read_events(&self, config: &Config) -> Result<Vec<DomainEvent>> {
        let path = self.input.as_deref().unwrap_or(&config.events_path);
        read_events(path)
    }
}

/// Reads records from `path`, or from stdin when `path` is `-`.
pub fn read_events(path: &Path) -> Result<Vec<DomainEvent>> {
    if path == Path::new("-") {
        let stdin = io::stdin();
        return parse_events(stdin.lock());
    }
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    parse_events(BufReader::new(file)).with_context(|| format!("failed to read {}", path.display()))
}

/// Parses one record per line.
///
/// Blank lines are ignored. A line that is not a valid record is skipped with
/// a warning; one bad record must not blank the whole day.
pub fn parse_events<R: BufRead>(reader: R) -> Result<Vec<DomainEvent>> {
    let mut events = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<DomainEvent>(trimmed) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(line = idx + 1, error = %e, "skipping invalid record"),
        }
    }
    tracing::debug!(count = events.len(), "read records");
    Ok(events)
}
