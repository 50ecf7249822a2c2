//! Typed interpretation of untrusted clinical field values.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::CoreError;

/// A field value after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading<T> {
    /// Absent, null, or blank.
    Missing,
    /// Present but not interpretable; holds the raw text.
    Malformed(String),
    /// A usable value.
    Value(T),
}

impl<T> Reading<T> {
    /// Whether a usable value is present.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// Get the value, if valid.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Map the contained value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Self::Missing => Reading::Missing,
            Self::Malformed(raw) => Reading::Malformed(raw),
            Self::Value(v) => Reading::Value(f(v)),
        }
    }
}

impl Reading<f64> {
    /// Interpret a raw value as a finite number.
    ///
    /// JSON numbers and numeric strings are accepted.
    pub fn numeric(raw: Option<&Value>) -> Self {
        match raw {
            None | Some(Value::Null) => Self::Missing,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => Self::Value(v),
                _ => Self::Malformed(n.to_string()),
            },
            Some(Value::String(s)) if s.trim().is_empty() => Self::Missing,
            Some(Value::String(s)) => match parse_finite(s) {
                Some(v) => Self::Value(v),
                None => Self::Malformed(s.clone()),
            },
            Some(other) => Self::Malformed(other.to_string()),
        }
    }
}

/// A parsed `systolic/diastolic` pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodPressure {
    /// Systolic pressure (mmHg).
    pub systolic: f64,
    /// Diastolic pressure (mmHg).
    pub diastolic: f64,
}

impl BloodPressure {
    /// Create a reading.
    pub fn new(systolic: f64, diastolic: f64) -> Self {
        Self {
            systolic,
            diastolic,
        }
    }

    /// Interpret a raw value. Only strings are accepted.
    pub fn from_raw(raw: Option<&Value>) -> Reading<Self> {
        match raw {
            None | Some(Value::Null) => Reading::Missing,
            Some(Value::String(s)) if s.trim().is_empty() => Reading::Missing,
            Some(Value::String(s)) => match s.parse() {
                Ok(bp) => Reading::Value(bp),
                Err(_) => Reading::Malformed(s.clone()),
            },
            Some(other) => Reading::Malformed(other.to_string()),
        }
    }
}

impl FromStr for BloodPressure {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidBloodPressure(s.to_string());

        let mut parts = s.split('/');
        let (Some(systolic), Some(diastolic), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let systolic = parse_finite(systolic).ok_or_else(invalid)?;
        let diastolic = parse_finite(diastolic).ok_or_else(invalid)?;
        Ok(Self::new(systolic, diastolic))
    }
}

impl fmt::Display for BloodPressure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.systolic, self.diastolic)
    }
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
