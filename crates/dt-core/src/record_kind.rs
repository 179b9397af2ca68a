//! Record kind enum as the single source of truth for kind strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a record's start and end are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Starts at `timestamp`, lasts `duration_hours`.
    Sleep,
    /// Starts at `timestamp`, lasts `duration_minutes` (default 15).
    Activity,
    /// Explicit `timestamp`..`end` range.
    Appointment,
    /// Fixed 15 minutes from the available timestamp.
    #[default]
    Point,
}

impl RecordKind {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Activity => "activity",
            Self::Appointment => "appointment",
            Self::Point => "point",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = UnknownRecordKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sleep" => Ok(Self::Sleep),
            "activity" | "exercise" | "workout" => Ok(Self::Activity),
            "appointment" | "meeting" | "calendar" => Ok(Self::Appointment),
            "point" | "meal" | "food" | "indulgence" | "log" => Ok(Self::Point),
            _ => Err(UnknownRecordKind(s.to_string())),
        }
    }
}

impl Serialize for RecordKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordKind {
    /// Unknown kinds and `null` fall back to [`RecordKind::Point`].
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let Some(s) = Option::<String>::deserialize(deserializer)? else {
            return Ok(Self::Point);
        };
        Ok(s.parse().unwrap_or_else(|err: UnknownRecordKind| {
            tracing::trace!(kind = %err.0, "treating unknown record kind as point");
            Self::Point
        }))
    }
}

/// Error type for unknown record kind strings.
#[derive(Debug, Clone)]
pub struct UnknownRecordKind(String);

impl fmt::Display for UnknownRecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record kind: {}", self.0)
    }
}

impl std::error::Error for UnknownRecordKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        let variants = [
            RecordKind::Sleep,
            RecordKind::Activity,
            RecordKind::Appointment,
            RecordKind::Point,
        ];

        for variant in &variants {
            let s = variant.to_string();
            let parsed: RecordKind = s.parse().expect("should parse");
            assert_eq!(parsed, *variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn aliases_parse() {
        assert_eq!("workout".parse::<RecordKind>().unwrap(), RecordKind::Activity);
        assert_eq!("meeting".parse::<RecordKind>().unwrap(), RecordKind::Appointment);
        assert_eq!("indulgence".parse::<RecordKind>().unwrap(), RecordKind::Point);
    }

    #[test]
    fn unknown_kind_errors_on_parse() {
        let err = "mood".parse::<RecordKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown record kind: mood");
    }

    #[test]
    fn unknown_kind_deserializes_as_point() {
        let kind: RecordKind = serde_json::from_str("\"mood\"").unwrap();
        assert_eq!(kind, RecordKind::Point);
    }
}
