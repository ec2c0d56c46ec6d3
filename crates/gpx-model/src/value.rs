//! Scalar values produced by the coercion registry.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::element::Element;

/// GPS fix type of a waypoint.
///
/// GPX 1.1 restricts `<fix>` to exactly these five tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixType {
    /// No fix.
    #[serde(rename = "none")]
    None,
    /// Two-dimensional fix.
    #[serde(rename = "2d")]
    TwoD,
    /// Three-dimensional fix.
    #[serde(rename = "3d")]
    ThreeD,
    /// Differential GPS.
    #[serde(rename = "dgps")]
    Dgps,
    /// Military signal.
    #[serde(rename = "pps")]
    Pps,
}

impl FixType {
    /// Returns the token as it appears in documents.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TwoD => "2d",
            Self::ThreeD => "3d",
            Self::Dgps => "dgps",
            Self::Pps => "pps",
        }
    }

    /// All fix types in schema order.
    pub const fn all() -> &'static [FixType] {
        &[Self::None, Self::TwoD, Self::ThreeD, Self::Dgps, Self::Pps]
    }
}

impl fmt::Display for FixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FixType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|fix| fix.as_str() == s)
            .ok_or_else(|| format!("Unknown fix type: {s}"))
    }
}

/// Point in time with the offset it was recorded in.
///
/// Displays and serializes as RFC 3339 with a numeric offset (`+00:00`, never
/// `Z`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<FixedOffset>);

impl Timestamp {
    pub fn new(datetime: DateTime<FixedOffset>) -> Self {
        Self(datetime)
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A coerced scalar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value (missing text, or an email with nothing to rebuild from).
    Null,
    /// Text taken verbatim from the document.
    Text(String),
    /// Decimal number, including coordinates and angles.
    Decimal(f64),
    /// Integer (counts, years, station ids).
    Integer(i64),
    Fix(FixType),
    Timestamp(Timestamp),
    /// Opaque children of an `<extensions>` element.
    Extensions(Vec<Element>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Self::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_fix(&self) -> Option<FixType> {
        match self {
            Self::Fix(fix) => Some(*fix),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<&Timestamp> {
        match self {
            Self::Timestamp(timestamp) => Some(timestamp),
            _ => None,
        }
    }

    pub fn as_extensions(&self) -> Option<&[Element]> {
        match self {
            Self::Extensions(children) => Some(children),
            _ => None,
        }
    }
}
