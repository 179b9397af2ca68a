//! Core type definitions with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A percentage option was NaN, infinite, or outside its allowed range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    PercentOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// A validated record identifier.
///
/// Record IDs must be non-empty strings. Uniqueness is the caller's concern;
/// the layout engine tolerates duplicates and keeps them as separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EventId(String);

impl EventId {
    /// Creates a new ID after validation.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::Empty { field: "event ID" });
        }
        Ok(Self(id))
    }

    /// Returns the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EventId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EventId> for String {
    fn from(id: EventId) -> Self {
        id.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EventId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Checks that `value` is a finite percentage within `[min, max]`, or
/// `[min, max)` when `max_exclusive` is set.
pub(crate) fn check_percent(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
    max_exclusive: bool,
) -> Result<f64, ValidationError> {
    let below_max = if max_exclusive { value < max } else { value <= max };
    if !value.is_finite() || value < min || !below_max {
        return Err(ValidationError::PercentOutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}
