//! GPX data model definitions.
//!
//! This crate holds the types shared by the reader and its consumers:
//!
//! - [`element`]: the namespaced element tree the reader interprets
//! - [`value`]: scalar values produced by coercion ([`Value`], [`FixType`], [`Timestamp`])
//! - [`record`]: generic parse results ([`Record`], [`Field`])
//! - [`gpx`]: typed track-log records built from generic records
//!
//! # Example
//!
//! ```
//! use gpx_model::{Field, Record, Value, Waypoint};
//!
//! let mut record = Record::new();
//! record.insert("lat", Field::Scalar(Value::Decimal(47.6)));
//! record.insert("lon", Field::Scalar(Value::Decimal(-122.3)));
//! record.insert("ele", Field::Scalar(Value::Decimal(12.5)));
//!
//! let waypoint = Waypoint::try_from(&record).unwrap();
//! assert_eq!(waypoint.elevation, Some(12.5));
//! ```

pub mod element;
pub mod error;
pub mod gpx;
pub mod record;
pub mod value;

pub use element::{Element, QualifiedName};
pub use error::{ModelError, Result};
pub use gpx::{
    Bounds, Copyright, Gpx, Link, Metadata, Person, Point, PointSegment, Route, TimedPoint,
    Track, TrackSegment, Waypoint,
};
pub use record::{Field, Record};
pub use value::{FixType, Timestamp, Value};
