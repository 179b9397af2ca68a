//! Percentage geometry for positioned entries.
//!
//! All values are percentages of the day-track: `top`/`height` of its 24-hour
//! vertical extent, `left`/`width` of its horizontal extent.

use serde::Serialize;

use crate::cluster::Cluster;
use crate::lanes::LaneAssignment;
use crate::layout::LayoutOptions;
use crate::normalize::DAY_MINUTES;

/// Smallest rendered height: 30 minutes of track.
pub const MIN_HEIGHT_PERCENT: f64 = 30.0 / 1440.0 * 100.0;

/// Where an entry sits on the day-track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Geometry {
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
}

/// A record placed on the day-track. The only thing renderers consume.
#[derive(Debug, PartialEq, Serialize)]
pub struct PositionedEntry<'a, E> {
    pub id: &'a str,
    pub start_minute: u32,
    pub end_minute: u32,
    pub lane: usize,
    pub lane_count: usize,
    #[serde(flatten)]
    pub geometry: Geometry,
    pub payload: &'a E,
}

impl<E> Clone for PositionedEntry<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for PositionedEntry<'_, E> {}

fn minutes_to_percent(minutes: f64) -> f64 {
    minutes / f64::from(DAY_MINUTES) * 100.0
}

/// Computes the geometry of an interval in `lane` of a cluster with
/// `lane_count` lanes.
///
/// The gutter is taken off the width only, never below half the lane width.
#[allow(clippy::cast_precision_loss)]
pub fn compute_geometry(
    start_minute: u32,
    end_minute: u32,
    lane: usize,
    lane_count: usize,
    options: &LayoutOptions,
) -> Geometry {
    let top = minutes_to_percent(f64::from(start_minute));
    let raw_height = minutes_to_percent(f64::from(end_minute.saturating_sub(start_minute)));
    let height = raw_height.max(options.min_height_percent());

    let lane_width = 100.0 / lane_count.max(1) as f64;
    let gutter = options.lane_gutter_percent().min(lane_width / 2.0);

    Geometry {
        top,
        height,
        left: lane as f64 * lane_width,
        width: lane_width - gutter,
    }
}

/// Positions every interval of a cluster, in the cluster's order.
pub fn position_cluster<'a, E>(
    cluster: &Cluster<'a, E>,
    lanes: &LaneAssignment,
    options: &LayoutOptions,
) -> Vec<PositionedEntry<'a, E>> {
    let lane_count = lanes.lane_count();
    cluster
        .intervals()
        .iter()
        .enumerate()
        .map(|(position, interval)| {
            let lane = lanes.lane_of(position).unwrap_or_default();
            PositionedEntry {
                id: interval.id,
                start_minute: interval.start_minute,
                end_minute: interval.end_minute,
                lane,
                lane_count,
                geometry: compute_geometry(
                    interval.start_minute,
                    interval.end_minute,
                    lane,
                    lane_count,
                    options,
                ),
                payload: interval.payload,
            }
        })
        .collect()
}
