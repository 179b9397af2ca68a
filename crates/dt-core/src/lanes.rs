//! Greedy lane assignment within a cluster.

use crate::cluster::Cluster;

/// Slack for comparing rendered ends, which are fractional once a percentage
/// floor is converted back to minutes.
const MINUTE_EPSILON: f64 = 1e-6;

/// Lane placement for one cluster.
///
/// Interval positions refer to the cluster's interval order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment {
    lanes: Vec<Vec<usize>>,
    lane_of: Vec<usize>,
}

impl LaneAssignment {
    /// Number of lanes the cluster needs.
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Lane index of the interval at `position` in the cluster.
    pub fn lane_of(&self, position: usize) -> Option<usize> {
        self.lane_of.get(position).copied()
    }

    /// Lanes left to right, each listing interval positions in placement order.
    pub fn lanes(&self) -> &[Vec<usize>] {
        &self.lanes
    }

    /// Lanes left to right as interval ids.
    pub fn lane_ids<'a, E>(&self, cluster: &Cluster<'a, E>) -> Vec<Vec<&'a str>> {
        let intervals = cluster.intervals();
        self.lanes
            .iter()
            .map(|lane| lane.iter().map(|&pos| intervals[pos].id).collect())
            .collect()
    }
}

/// Assigns each interval of `cluster` to the leftmost lane where nothing
/// already placed is still on screen when it starts.
///
/// "On screen" uses the rendered extent: an interval shorter than
/// `floor_minutes` occupies the lane until `start + floor_minutes`. With a zero
/// floor this is the plain `placed.end <= candidate.start` test.
///
/// A floor can therefore cost an extra lane. With a 30 minute floor, 09:00-10:00,
/// 09:00-09:05 and 09:10-09:30 need three lanes: the five minute entry is drawn
/// until 09:30, so 09:10 cannot share its lane without covering it on screen.
pub fn assign_lanes<E>(cluster: &Cluster<'_, E>, floor_minutes: f64) -> LaneAssignment {
    let intervals = cluster.intervals();
    let mut lanes: Vec<Vec<usize>> = Vec::new();
    let mut lane_of = Vec::with_capacity(intervals.len());

    for (position, candidate) in intervals.iter().enumerate() {
        let start = f64::from(candidate.start_minute);
        let free = lanes.iter().position(|lane| {
            lane.iter()
                .all(|&placed| intervals[placed].rendered_end(floor_minutes) <= start + MINUTE_EPSILON)
        });

        let lane = free.unwrap_or_else(|| {
            lanes.push(Vec::new());
            lanes.len() - 1
        });
        lanes[lane].push(position);
        lane_of.push(lane);
    }

    LaneAssignment { lanes, lane_of }
}
