//! Timestamp parsing for `datetime` values.
//!
//! GPX stores times as `xsd:dateTime`. Accepted forms, in order:
//!
//! | Form | Example | Offset |
//! |------|---------|--------|
//! | RFC 3339 | `2009-10-17T18:37:26Z`, `2009-10-17T20:37:26.5+02:00` | as written |
//! | zone-less date-time | `2009-10-17T18:37:26` | UTC |
//! | date | `2009-10-17` | UTC, midnight |

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use gpx_model::Timestamp;

use crate::error::{GpxError, Result};

/// Parse timestamp text. Surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns [`GpxError::InvalidTimestamp`] carrying the RFC 3339 parse failure
/// when no accepted form matches.
pub fn parse_timestamp(text: &str) -> Result<Timestamp> {
    let trimmed = text.trim();
    let error = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(datetime) => return Ok(Timestamp::new(datetime)),
        Err(error) => error,
    };
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(Timestamp::from(naive.and_utc()));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(Timestamp::from(date.and_time(NaiveTime::MIN).and_utc()));
    }
    Err(GpxError::InvalidTimestamp {
        value: text.to_string(),
        source: error,
    })
}
