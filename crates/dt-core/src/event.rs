//! Heterogeneous day records and the capability the layout engine needs from them.

use chrono::{DateTime, Duration, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::normalize::SkipReason;
use crate::record_kind::RecordKind;
use crate::types::EventId;

/// Duration assumed for an activity that does not state one.
pub const DEFAULT_ACTIVITY_MINUTES: f64 = 15.0;

/// Fixed duration of a point-in-time record.
pub const POINT_EVENT_MINUTES: f64 = 15.0;

/// The wall-clock range a record occupies, before clamping to a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// A record that can be placed on the day timeline.
///
/// Each call site supplies its own kind-specific rules through `span`; the
/// layout engine only ever sees the resulting range.
pub trait TimelineEvent {
    /// Identifier carried through to the positioned entry.
    fn id(&self) -> &str;

    /// Derives the record's start and end, or the reason it cannot be placed.
    fn span(&self) -> Result<EventSpan, SkipReason>;
}

/// A day record as delivered by the data layer.
///
/// Only the timing fields are interpreted. Everything else lands in `extra`
/// and is passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: EventId,
    /// Absent kinds are point-in-time records.
    #[serde(default)]
    pub kind: RecordKind,
    /// Primary timestamp.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<NaiveDateTime>,
    /// Explicit end for range kinds.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub end: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    /// Alternate timestamp used by indulgence logs.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub indulgence_timestamp: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DomainEvent {
    /// Creates a record with no timing fields set.
    pub fn new(id: EventId, kind: RecordKind) -> Self {
        Self {
            id,
            kind,
            timestamp: None,
            end: None,
            duration_hours: None,
            duration_minutes: None,
            indulgence_timestamp: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl TimelineEvent for DomainEvent {
    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn span(&self) -> Result<EventSpan, SkipReason> {
        match self.kind {
            RecordKind::Sleep => {
                let start = required(self.timestamp, "timestamp")?;
                let hours = self.duration_hours.ok_or(SkipReason::MissingDuration)?;
                span_for(start, hours * 60.0)
            }
            RecordKind::Activity => {
                let start = required(self.timestamp, "timestamp")?;
                let minutes = self.duration_minutes.unwrap_or(DEFAULT_ACTIVITY_MINUTES);
                span_for(start, minutes)
            }
            RecordKind::Appointment => Ok(EventSpan {
                start: required(self.timestamp, "timestamp")?,
                end: required(self.end, "end")?,
            }),
            RecordKind::Point => {
                let start = required(
                    self.indulgence_timestamp.or(self.timestamp),
                    "timestamp",
                )?;
                span_for(start, POINT_EVENT_MINUTES)
            }
        }
    }
}

fn required(
    value: Option<NaiveDateTime>,
    field: &'static str,
) -> Result<NaiveDateTime, SkipReason> {
    value.ok_or(SkipReason::MissingTimestamp { field })
}

/// Builds the span `start..start + minutes`, rejecting durations that are not
/// finite or do not fit a calendar date.
#[allow(clippy::cast_possible_truncation)]
fn span_for(start: NaiveDateTime, minutes: f64) -> Result<EventSpan, SkipReason> {
    let invalid = || SkipReason::InvalidDuration { value: minutes };
    if !minutes.is_finite() {
        return Err(invalid());
    }
    let seconds = (minutes * 60.0).round();
    let duration = Duration::try_seconds(seconds as i64).ok_or_else(invalid)?;
    let end = start.checked_add_signed(duration).ok_or_else(invalid)?;
    Ok(EventSpan { start, end })
}

/// Parses a timestamp as local wall-clock time.
///
/// Accepts naive ISO 8601 (`2025-01-29T09:00:00`, optional fraction), a space
/// instead of `T`, minute precision, or RFC 3339 with an offset. An offset is
/// dropped without converting: the reading on the clock is what counts.
pub fn parse_wall_clock(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok())
}

/// Deserializes an optional timestamp, mapping anything unparseable to `None`
/// so the record is dropped at normalization instead of failing the batch.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = raw.as_ref().and_then(serde_json::Value::as_str).and_then(parse_wall_clock);
    if parsed.is_none() && raw.as_ref().is_some_and(|v| !v.is_null()) {
        tracing::trace!(value = ?raw, "ignoring unparseable timestamp");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 29)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record(kind: RecordKind) -> DomainEvent {
        DomainEvent::new(EventId::new("r-1").unwrap(), kind)
    }

    // ========== Span Derivation Tests ==========

    #[test]
    fn sleep_span_uses_hours() {
        let mut sleep = record(RecordKind::Sleep);
        sleep.timestamp = Some(at(22, 30));
        sleep.duration_hours = Some(7.5);

        let span = sleep.span().unwrap();
        assert_eq!(span.start, at(22, 30));
        assert_eq!(span.end, at(22, 30) + Duration::minutes(450));
    }

    #[test]
    fn sleep_without_duration_is_skipped() {
        let mut sleep = record(RecordKind::Sleep);
        sleep.timestamp = Some(at(22, 30));
        assert_eq!(sleep.span(), Err(SkipReason::MissingDuration));
    }

    #[test]
    fn activity_defaults_to_fifteen_minutes() {
        let mut walk = record(RecordKind::Activity);
        walk.timestamp = Some(at(7, 0));
        assert_eq!(walk.span().unwrap().end, at(7, 15));

        walk.duration_minutes = Some(40.0);
        assert_eq!(walk.span().unwrap().end, at(7, 40));
    }

    #[test]
    fn appointment_requires_both_ends() {
        let mut appt = record(RecordKind::Appointment);
        appt.timestamp = Some(at(14, 0));
        assert_eq!(
            appt.span(),
            Err(SkipReason::MissingTimestamp { field: "end" })
        );

        appt.end = Some(at(15, 0));
        assert_eq!(
            appt.span().unwrap(),
            EventSpan {
                start: at(14, 0),
                end: at(15, 0)
            }
        );

        appt.timestamp = None;
        assert_eq!(
            appt.span(),
            Err(SkipReason::MissingTimestamp { field: "timestamp" })
        );
    }

    #[test]
    fn point_prefers_indulgence_timestamp() {
        let mut snack = record(RecordKind::Point);
        snack.timestamp = Some(at(12, 0));
        snack.indulgence_timestamp = Some(at(15, 30));

        let span = snack.span().unwrap();
        assert_eq!(span.start, at(15, 30));
        assert_eq!(span.end, at(15, 45));
    }

    #[test]
    fn point_without_any_timestamp_is_skipped() {
        let snack = record(RecordKind::Point);
        assert_eq!(
            snack.span(),
            Err(SkipReason::MissingTimestamp { field: "timestamp" })
        );
    }

    #[test]
    fn non_finite_duration_is_skipped() {
        let mut walk = record(RecordKind::Activity);
        walk.timestamp = Some(at(7, 0));
        walk.duration_minutes = Some(f64::INFINITY);
        assert!(matches!(
            walk.span(),
            Err(SkipReason::InvalidDuration { .. })
        ));
    }

    // ========== Deserialization Tests ==========

    #[test]
    fn deserializes_with_passthrough_fields() {
        let json = r#"{
            "id": "meal-1",
            "kind": "meal",
            "timestamp": "2025-01-29T12:30:00",
            "calories": 640,
            "label": "lunch"
        }"#;
        let event: DomainEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.kind, RecordKind::Point);
        assert_eq!(event.timestamp, Some(at(12, 30)));
        assert_eq!(event.extra["calories"], 640);
        assert_eq!(event.extra["label"], "lunch");
    }

    #[test]
    fn unparseable_timestamp_becomes_none() {
        let json = r#"{"id": "x", "kind": "activity", "timestamp": "last tuesday"}"#;
        let event: DomainEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.timestamp, None);
        assert_eq!(
            event.span(),
            Err(SkipReason::MissingTimestamp { field: "timestamp" })
        );
    }

    #[test]
    fn event_rejects_empty_id() {
        let json = r#"{"id": "", "kind": "point", "timestamp": "2025-01-29T12:30:00"}"#;
        let result: Result<DomainEvent, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn missing_or_null_kind_is_a_point() {
        for json in [
            r#"{"id": "x", "timestamp": "2025-01-29T09:00:00"}"#,
            r#"{"id": "x", "kind": null, "timestamp": "2025-01-29T09:00:00"}"#,
        ] {
            let event: DomainEvent = serde_json::from_str(json).unwrap();
            assert_eq!(event.kind, RecordKind::Point);
            let span = event.span().unwrap();
            assert_eq!((span.start, span.end), (at(9, 0), at(9, 15)));
        }
    }

    #[test]
    fn parse_wall_clock_keeps_clock_reading() {
        assert_eq!(parse_wall_clock("2025-01-29T09:15:00+05:00"), Some(at(9, 15)));
        assert_eq!(parse_wall_clock("2025-01-29T09:15:00Z"), Some(at(9, 15)));
        assert_eq!(parse_wall_clock("2025-01-29 09:15:00"), Some(at(9, 15)));
        assert_eq!(parse_wall_clock("2025-01-29T09:15"), Some(at(9, 15)));
        assert_eq!(parse_wall_clock("nope"), None);
    }
}
