//! Typed GPX 1.1 records.
//!
//! Every type converts from the generic [`Record`] the reader produces for the
//! matching schema. Scalar validation already happened during parsing, so
//! conversion only fails when a required field is missing or an integer does
//! not fit the narrower Rust type.

use serde::Serialize;

use crate::element::Element;
use crate::error::{ModelError, Result};
use crate::record::Record;
use crate::value::{FixType, Timestamp};

/// A plain latitude/longitude pair in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    fn from_record(record: &Record, kind: &'static str) -> Result<Self> {
        Ok(Self {
            latitude: required_decimal(record, kind, "lat")?,
            longitude: required_decimal(record, kind, "lon")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub href: String,
    pub text: Option<String>,
    pub mime_type: Option<String>,
}

impl TryFrom<&Record> for Link {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            href: record
                .text("href")
                .map(str::to_string)
                .ok_or(ModelError::MissingField {
                    record: "link",
                    field: "href",
                })?,
            text: owned_text(record, "text"),
            mime_type: owned_text(record, "type"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub name: Option<String>,
    pub email: Option<String>,
    pub link: Option<Link>,
}

impl TryFrom<&Record> for Person {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            name: owned_text(record, "name"),
            email: owned_text(record, "email"),
            link: record.record("link").map(Link::try_from).transpose()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Copyright {
    pub author: Option<String>,
    pub year: Option<i32>,
    pub license: Option<String>,
}

impl TryFrom<&Record> for Copyright {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            author: owned_text(record, "author"),
            year: narrow(record, "copyright", "year")?,
            license: owned_text(record, "license"),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl TryFrom<&Record> for Bounds {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            min: Point::new(
                required_decimal(record, "bounds", "minlat")?,
                required_decimal(record, "bounds", "minlon")?,
            ),
            max: Point::new(
                required_decimal(record, "bounds", "maxlat")?,
                required_decimal(record, "bounds", "maxlon")?,
            ),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub author: Option<Person>,
    pub copyright: Option<Copyright>,
    pub links: Vec<Link>,
    pub time: Option<Timestamp>,
    pub keywords: Option<String>,
    pub bounds: Option<Bounds>,
    pub extensions: Vec<Element>,
}

impl TryFrom<&Record> for Metadata {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            name: owned_text(record, "name"),
            description: owned_text(record, "desc"),
            author: record.record("author").map(Person::try_from).transpose()?,
            copyright: record
                .record("copyright")
                .map(Copyright::try_from)
                .transpose()?,
            links: links(record)?,
            time: record.timestamp("time").copied(),
            keywords: owned_text(record, "keywords"),
            bounds: record.record("bounds").map(Bounds::try_from).transpose()?,
            extensions: record.extensions("extensions").to_vec(),
        })
    }
}

/// A waypoint, route point or track point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub point: Point,
    pub elevation: Option<f64>,
    pub time: Option<Timestamp>,
    pub magnetic_variation: Option<f64>,
    pub geoid_height: Option<f64>,
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub links: Vec<Link>,
    pub symbol: Option<String>,
    pub kind: Option<String>,
    pub fix: Option<FixType>,
    pub satellites: Option<u32>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
    pub pdop: Option<f64>,
    pub age_of_dgps_data: Option<f64>,
    pub dgps_id: Option<u16>,
    pub extensions: Vec<Element>,
}

impl TryFrom<&Record> for Waypoint {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            point: Point::from_record(record, "waypoint")?,
            elevation: record.decimal("ele"),
            time: record.timestamp("time").copied(),
            magnetic_variation: record.decimal("magvar"),
            geoid_height: record.decimal("geoidheight"),
            name: owned_text(record, "name"),
            comment: owned_text(record, "cmt"),
            description: owned_text(record, "desc"),
            source: owned_text(record, "src"),
            links: links(record)?,
            symbol: owned_text(record, "sym"),
            kind: owned_text(record, "type"),
            fix: record.fix("fix"),
            satellites: narrow(record, "waypoint", "sat")?,
            hdop: record.decimal("hdop"),
            vdop: record.decimal("vdop"),
            pdop: record.decimal("pdop"),
            age_of_dgps_data: record.decimal("ageofdgpsdata"),
            dgps_id: narrow(record, "waypoint", "dgpsid")?,
            extensions: record.extensions("extensions").to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub links: Vec<Link>,
    pub number: Option<u32>,
    pub kind: Option<String>,
    pub points: Vec<Waypoint>,
    pub extensions: Vec<Element>,
}

impl TryFrom<&Record> for Route {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            name: owned_text(record, "name"),
            comment: owned_text(record, "cmt"),
            description: owned_text(record, "desc"),
            source: owned_text(record, "src"),
            links: links(record)?,
            number: narrow(record, "route", "number")?,
            kind: owned_text(record, "type"),
            points: collect(record.records("rtept"))?,
            extensions: record.extensions("extensions").to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSegment {
    pub points: Vec<Waypoint>,
    pub extensions: Vec<Element>,
}

impl TryFrom<&Record> for TrackSegment {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            points: collect(record.records("trkpt"))?,
            extensions: record.extensions("extensions").to_vec(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub name: Option<String>,
    pub comment: Option<String>,
    pub description: Option<String>,
    pub source: Option<String>,
    pub links: Vec<Link>,
    pub number: Option<u32>,
    pub kind: Option<String>,
    pub segments: Vec<TrackSegment>,
    pub extensions: Vec<Element>,
}

impl Track {
    /// Total number of points over all segments.
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(|segment| segment.points.len()).sum()
    }
}

impl TryFrom<&Record> for Track {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            name: owned_text(record, "name"),
            comment: owned_text(record, "cmt"),
            description: owned_text(record, "desc"),
            source: owned_text(record, "src"),
            links: links(record)?,
            number: narrow(record, "track", "number")?,
            kind: owned_text(record, "type"),
            segments: collect(record.records("trkseg"))?,
            extensions: record.extensions("extensions").to_vec(),
        })
    }
}

/// A `<pt>` entry: position with optional elevation and time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedPoint {
    pub point: Point,
    pub elevation: Option<f64>,
    pub time: Option<Timestamp>,
}

impl TryFrom<&Record> for TimedPoint {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            point: Point::from_record(record, "point")?,
            elevation: record.decimal("ele"),
            time: record.timestamp("time").copied(),
        })
    }
}

/// An ordered sequence of `<pt>` entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSegment {
    pub points: Vec<TimedPoint>,
}

impl TryFrom<&Record> for PointSegment {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            points: collect(record.records("pt"))?,
        })
    }
}

/// A whole GPX document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gpx {
    pub version: String,
    pub creator: Option<String>,
    pub metadata: Option<Metadata>,
    pub waypoints: Vec<Waypoint>,
    pub routes: Vec<Route>,
    pub tracks: Vec<Track>,
    pub extensions: Vec<Element>,
}

impl TryFrom<&Record> for Gpx {
    type Error = ModelError;

    fn try_from(record: &Record) -> Result<Self> {
        Ok(Self {
            version: record
                .text("version")
                .map(str::to_string)
                .ok_or(ModelError::MissingField {
                    record: "gpx",
                    field: "version",
                })?,
            creator: owned_text(record, "creator"),
            metadata: record
                .record("metadata")
                .map(Metadata::try_from)
                .transpose()?,
            waypoints: collect(record.records("wpt"))?,
            routes: collect(record.records("rte"))?,
            tracks: collect(record.records("trk"))?,
            extensions: record.extensions("extensions").to_vec(),
        })
    }
}

fn owned_text(record: &Record, field: &str) -> Option<String> {
    record.text(field).map(str::to_string)
}

fn required_decimal(record: &Record, kind: &'static str, field: &'static str) -> Result<f64> {
    record.decimal(field).ok_or(ModelError::MissingField {
        record: kind,
        field,
    })
}

fn narrow<T: TryFrom<i64>>(
    record: &Record,
    kind: &'static str,
    field: &'static str,
) -> Result<Option<T>> {
    record
        .integer(field)
        .map(|value| {
            T::try_from(value).map_err(|_| ModelError::InvalidField {
                record: kind,
                field,
                reason: format!("{value} does not fit {}", std::any::type_name::<T>()),
            })
        })
        .transpose()
}

fn links(record: &Record) -> Result<Vec<Link>> {
    collect(record.records("link"))
}

fn collect<'a, T>(records: &'a [Record]) -> Result<Vec<T>>
where
    T: TryFrom<&'a Record, Error = ModelError>,
{
    records.iter().map(T::try_from).collect()
}
