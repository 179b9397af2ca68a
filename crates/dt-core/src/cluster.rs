//! Overlap clustering.
//!
//! A cluster is a maximal set of intervals connected by overlap. Clusters are
//! laid out independently, so each one gets its own lane count.

use crate::normalize::{TimeInterval, compare_intervals, sort_intervals};

/// Intervals connected transitively by overlap, in layout order.
#[derive(Debug)]
pub struct Cluster<'a, E> {
    intervals: Vec<TimeInterval<'a, E>>,
}

impl<'a, E> Cluster<'a, E> {
    pub fn intervals(&self) -> &[TimeInterval<'a, E>] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Always false: clusters are created with one interval and only grow.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Earliest start in the cluster.
    pub fn start_minute(&self) -> u32 {
        self.intervals
            .iter()
            .map(|i| i.start_minute)
            .min()
            .unwrap_or_default()
    }

    /// Latest end in the cluster.
    pub fn end_minute(&self) -> u32 {
        self.intervals
            .iter()
            .map(|i| i.end_minute)
            .max()
            .unwrap_or_default()
    }

    /// True if `interval` overlaps any member, not just the most recent one.
    fn touches(&self, interval: &TimeInterval<'a, E>) -> bool {
        self.intervals.iter().any(|member| member.overlaps(interval))
    }
}

/// Groups intervals into maximal overlap clusters.
///
/// Expects `intervals` in layout order (see [`sort_intervals`]); each interval
/// joins the first cluster it overlaps. Should an interval bridge several
/// existing clusters, which only happens for unsorted input, they are merged.
/// Clusters come back ordered by their first interval.
pub fn cluster_intervals<'a, E>(intervals: Vec<TimeInterval<'a, E>>) -> Vec<Cluster<'a, E>> {
    let mut clusters: Vec<Cluster<'a, E>> = Vec::new();

    for interval in intervals {
        let matching: Vec<usize> = clusters
            .iter()
            .enumerate()
            .filter(|(_, cluster)| cluster.touches(&interval))
            .map(|(idx, _)| idx)
            .collect();

        let Some((&first, rest)) = matching.split_first() else {
            clusters.push(Cluster {
                intervals: vec![interval],
            });
            continue;
        };

        // Highest index first so earlier indices stay valid
        for &idx in rest.iter().rev() {
            let absorbed = clusters.remove(idx);
            clusters[first].intervals.extend(absorbed.intervals);
        }
        clusters[first].intervals.push(interval);
    }

    for cluster in &mut clusters {
        sort_intervals(&mut cluster.intervals);
    }
    clusters.sort_by(|a, b| compare_intervals(&a.intervals[0], &b.intervals[0]));
    clusters
}
