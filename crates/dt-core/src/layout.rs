//! Day timeline layout.
//!
//! # Algorithm Summary
//!
//! 1. Normalize records into minute intervals of the day, dropping the ones
//!    that cannot be placed
//! 2. Group overlapping intervals into clusters
//! 3. Within each cluster, greedily assign lanes
//! 4. Convert minutes and lanes into percentage geometry
//!
//! Every call is independent: no caching, no shared state.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::cluster::cluster_intervals;
use crate::event::TimelineEvent;
use crate::geometry::{MIN_HEIGHT_PERCENT, PositionedEntry, position_cluster};
use crate::lanes::assign_lanes;
use crate::normalize::{DAY_MINUTES, normalize_events};
use crate::types::{ValidationError, check_percent};

/// Tunables for the geometry stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    min_height_percent: f64,
    lane_gutter_percent: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            min_height_percent: MIN_HEIGHT_PERCENT,
            lane_gutter_percent: 0.0,
        }
    }
}

impl LayoutOptions {
    /// Creates options after validation.
    ///
    /// `min_height_percent` must lie in `[0, 100]` and `lane_gutter_percent`
    /// in `[0, 100)`.
    pub fn new(min_height_percent: f64, lane_gutter_percent: f64) -> Result<Self, ValidationError> {
        Ok(Self {
            min_height_percent: check_percent(
                "min_height_percent",
                min_height_percent,
                0.0,
                100.0,
                false,
            )?,
            lane_gutter_percent: check_percent(
                "lane_gutter_percent",
                lane_gutter_percent,
                0.0,
                100.0,
                true,
            )?,
        })
    }

    pub const fn min_height_percent(&self) -> f64 {
        self.min_height_percent
    }

    pub const fn lane_gutter_percent(&self) -> f64 {
        self.lane_gutter_percent
    }

    /// The height floor expressed in minutes of track.
    pub fn floor_minutes(&self) -> f64 {
        self.min_height_percent / 100.0 * f64::from(DAY_MINUTES)
    }
}

/// Shape of one cluster in a day's layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClusterSummary {
    pub start_minute: u32,
    pub end_minute: u32,
    pub lane_count: usize,
    pub size: usize,
}

/// A day's entries together with how they were grouped.
#[derive(Debug, Serialize)]
pub struct DayLayout<'a, E> {
    pub entries: Vec<PositionedEntry<'a, E>>,
    pub clusters: Vec<ClusterSummary>,
    /// Records that could not be placed on this day.
    pub skipped: usize,
}

/// Local midnight of `date`.
pub fn day_start_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Lays out a day's records and reports the cluster structure.
///
/// Entries come back cluster by cluster, each cluster in layout order, which
/// makes the output ordered by start minute with longer entries first on ties.
pub fn layout_day<'a, E: TimelineEvent>(
    events: &'a [E],
    day_start: NaiveDateTime,
    options: &LayoutOptions,
) -> DayLayout<'a, E> {
    let intervals = normalize_events(events, day_start);
    let skipped = events.len() - intervals.len();
    let clusters = cluster_intervals(intervals);
    let floor_minutes = options.floor_minutes();

    let mut entries = Vec::with_capacity(events.len() - skipped);
    let mut summaries = Vec::with_capacity(clusters.len());

    for cluster in &clusters {
        let lanes = assign_lanes(cluster, floor_minutes);
        summaries.push(ClusterSummary {
            start_minute: cluster.start_minute(),
            end_minute: cluster.end_minute(),
            lane_count: lanes.lane_count(),
            size: cluster.len(),
        });
        entries.extend(position_cluster(cluster, &lanes, options));
    }

    tracing::debug!(
        %day_start,
        records = events.len(),
        placed = entries.len(),
        skipped,
        clusters = summaries.len(),
        max_lanes = summaries.iter().map(|s| s.lane_count).max().unwrap_or(0),
        "laid out day"
    );

    DayLayout {
        entries,
        clusters: summaries,
        skipped,
    }
}

/// Lays out a day's records on the day-track.
///
/// Records that cannot be placed are left out; an empty result is not an
/// error.
pub fn layout_day_timeline<'a, E: TimelineEvent>(
    events: &'a [E],
    day_start: NaiveDateTime,
    options: &LayoutOptions,
) -> Vec<PositionedEntry<'a, E>> {
    layout_day(events, day_start, options).entries
}
