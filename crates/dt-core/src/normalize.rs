//! Record normalization.
//!
//! Turns a day's records into canonical [`TimeInterval`]s: whole-minute offsets
//! from the day's midnight, clamped to `0..=1440`. A record that cannot be
//! placed is dropped on its own; it never aborts the batch.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::event::TimelineEvent;

/// Minutes in the day-track.
pub const DAY_MINUTES: u32 = 1440;

/// Why a record was left off the day's layout.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SkipReason {
    /// A timestamp the record's kind requires is absent or unparseable.
    #[error("missing {field}")]
    MissingTimestamp { field: &'static str },

    /// A sleep record without `duration_hours`.
    #[error("missing duration")]
    MissingDuration,

    /// The stated duration is not a usable number of minutes.
    #[error("invalid duration of {value} minutes")]
    InvalidDuration { value: f64 },

    /// Nothing of the record remains inside the day.
    #[error("empty after clamping to the day (minutes {start_minute}..{end_minute})")]
    EmptyAfterClamp { start_minute: i64, end_minute: i64 },
}

/// A record's position on the day, in minutes from midnight.
///
/// Invariant: `start_minute < end_minute <= DAY_MINUTES`.
#[derive(Debug)]
pub struct TimeInterval<'a, E> {
    pub id: &'a str,
    pub start_minute: u32,
    pub end_minute: u32,
    pub payload: &'a E,
}

impl<E> Clone for TimeInterval<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for TimeInterval<'_, E> {}

impl<E> TimeInterval<'_, E> {
    /// Half-open overlap test: touching intervals do not overlap.
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && self.end_minute > other.start_minute
    }

    pub const fn duration_minutes(&self) -> u32 {
        self.end_minute - self.start_minute
    }

    /// End of the interval as drawn, once a height floor of `floor_minutes`
    /// is applied.
    pub fn rendered_end(&self, floor_minutes: f64) -> f64 {
        f64::from(self.end_minute).max(f64::from(self.start_minute) + floor_minutes)
    }
}

/// Layout order: start ascending, then longer first, then input order.
pub fn compare_intervals<E>(a: &TimeInterval<'_, E>, b: &TimeInterval<'_, E>) -> Ordering {
    a.start_minute
        .cmp(&b.start_minute)
        .then_with(|| b.end_minute.cmp(&a.end_minute))
}

/// Sorts intervals into layout order. The sort is stable, so equal intervals
/// keep their input order.
pub fn sort_intervals<E>(intervals: &mut [TimeInterval<'_, E>]) {
    intervals.sort_by(compare_intervals);
}

fn minutes_since(instant: NaiveDateTime, day_start: NaiveDateTime) -> i64 {
    (instant - day_start).num_minutes()
}

/// Normalizes a single record against the day starting at `day_start`.
pub fn normalize_event<E: TimelineEvent>(
    event: &E,
    day_start: NaiveDateTime,
) -> Result<TimeInterval<'_, E>, SkipReason> {
    let span = event.span()?;
    let start = minutes_since(span.start, day_start).max(0);
    let end = minutes_since(span.end, day_start).min(i64::from(DAY_MINUTES));

    if end <= start {
        return Err(SkipReason::EmptyAfterClamp {
            start_minute: start,
            end_minute: end,
        });
    }

    // 0 <= start < end <= DAY_MINUTES after the clamp above
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (start_minute, end_minute) = (start as u32, end as u32);

    Ok(TimeInterval {
        id: event.id(),
        start_minute,
        end_minute,
        payload: event,
    })
}

/// Normalizes a day's records, dropping the ones that cannot be placed, and
/// returns the survivors in layout order.
pub fn normalize_events<E: TimelineEvent>(
    events: &[E],
    day_start: NaiveDateTime,
) -> Vec<TimeInterval<'_, E>> {
    let mut intervals: Vec<_> = events
        .iter()
        .filter_map(|event| match normalize_event(event, day_start) {
            Ok(interval) => Some(interval),
            Err(reason) => {
                tracing::debug!(id = %event.id(), %reason, "dropping record from day layout");
                None
            }
        })
        .collect();

    sort_intervals(&mut intervals);
    intervals
}
