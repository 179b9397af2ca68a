//! Core layout engine for the day timeline.
//!
//! This crate contains the fundamental types and logic for:
//! - Normalization: turning heterogeneous day records into minute intervals
//! - Clustering: grouping intervals that overlap, directly or through others
//! - Lanes: greedy side-by-side placement within a cluster
//! - Geometry: percentage positions on a 24-hour track

pub mod cluster;
pub mod event;
pub mod geometry;
pub mod lanes;
mod layout;
pub mod normalize;
pub mod record_kind;
pub mod types;

pub use event::{DomainEvent, EventSpan, TimelineEvent, parse_wall_clock};
pub use geometry::{Geometry, MIN_HEIGHT_PERCENT, PositionedEntry};
pub use layout::{
    ClusterSummary, DayLayout, LayoutOptions, day_start_of, layout_day, layout_day_timeline,
};
pub use normalize::{DAY_MINUTES, SkipReason, TimeInterval, normalize_event, normalize_events};
pub use record_kind::{RecordKind, UnknownRecordKind};
pub use types::{EventId, ValidationError};
