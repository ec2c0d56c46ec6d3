//! GPX 1.1 type schema table.
//!
//! Every structural type is a [`Schema`]: which attributes to read (each with
//! a scalar type name) and which child elements to read (each with a
//! [`FieldType`]). Tables are compile-time constants; the interpreter walks
//! them instead of reflecting over struct fields.

use self::FieldType::{Repeated, Scalar, Structural};

/// The namespace every GPX 1.1 element lives in.
pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";

/// The only document version this reader understands.
pub const SUPPORTED_VERSION: &str = "1.1";

/// How a child tag is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// At most one child, coerced by the named scalar coercion.
    Scalar(&'static str),
    /// At most one child, parsed recursively with the named schema.
    Structural(&'static str),
    /// Zero or more children, each parsed with the named schema, in document order.
    Repeated(&'static str),
}

impl FieldType {
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Scalar(name) | Self::Structural(name) | Self::Repeated(name) => name,
        }
    }

    pub const fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated(_))
    }
}

/// Attribute and child layout of one structural type.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub name: &'static str,
    /// Attribute name to scalar type name.
    pub attributes: &'static [(&'static str, &'static str)],
    /// Child tag (local name) to field type.
    pub children: &'static [(&'static str, FieldType)],
}

impl Schema {
    /// Child tags expected at most once.
    pub fn single_tags(&self) -> Vec<&'static str> {
        self.children
            .iter()
            .filter(|(_, field)| !field.is_repeated())
            .map(|(tag, _)| *tag)
            .collect()
    }

    /// Child tags expected any number of times.
    pub fn multi_tags(&self) -> Vec<&'static str> {
        self.children
            .iter()
            .filter(|(_, field)| field.is_repeated())
            .map(|(tag, _)| *tag)
            .collect()
    }

    /// Field type declared for a child tag.
    pub fn child(&self, tag: &str) -> Option<FieldType> {
        self.children
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, field)| *field)
    }
}

pub const GPX: Schema = Schema {
    name: "gpx",
    attributes: &[("version", "string"), ("creator", "string")],
    children: &[
        ("metadata", Structural("metadata")),
        ("wpt", Repeated("waypoint")),
        ("rte", Repeated("route")),
        ("trk", Repeated("track")),
        ("extensions", Scalar("extensions")),
    ],
};

/// The root without metadata and the top-level collections, which the
/// document reads through its own caches.
pub const GPX_HEADER: Schema = Schema {
    name: "gpx",
    attributes: GPX.attributes,
    children: &[("extensions", Scalar("extensions"))],
};

pub const METADATA: Schema = Schema {
    name: "metadata",
    attributes: &[],
    children: &[
        ("name", Scalar("string")),
        ("desc", Scalar("string")),
        ("author", Structural("person")),
        ("copyright", Structural("copyright")),
        ("link", Repeated("link")),
        ("time", Scalar("datetime")),
        ("keywords", Scalar("string")),
        ("bounds", Structural("bounds")),
        ("extensions", Scalar("extensions")),
    ],
};

pub const WAYPOINT: Schema = Schema {
    name: "waypoint",
    attributes: &[("lat", "latitude"), ("lon", "longitude")],
    children: &[
        ("ele", Scalar("decimal")),
        ("time", Scalar("datetime")),
        ("magvar", Scalar("degrees")),
        ("geoidheight", Scalar("decimal")),
        ("name", Scalar("string")),
        ("cmt", Scalar("string")),
        ("desc", Scalar("string")),
        ("src", Scalar("string")),
        ("link", Repeated("link")),
        ("sym", Scalar("string")),
        ("type", Scalar("string")),
        ("fix", Scalar("fix")),
        ("sat", Scalar("unsigned")),
        ("hdop", Scalar("decimal")),
        ("vdop", Scalar("decimal")),
        ("pdop", Scalar("decimal")),
        ("ageofdgpsdata", Scalar("decimal")),
        ("dgpsid", Scalar("dgpsid")),
        ("extensions", Scalar("extensions")),
    ],
};

pub const ROUTE: Schema = Schema {
    name: "route",
    attributes: &[],
    children: &[
        ("name", Scalar("string")),
        ("cmt", Scalar("string")),
        ("desc", Scalar("string")),
        ("src", Scalar("string")),
        ("link", Repeated("link")),
        ("number", Scalar("unsigned")),
        ("type", Scalar("string")),
        ("extensions", Scalar("extensions")),
        ("rtept", Repeated("waypoint")),
    ],
};

pub const TRACK: Schema = Schema {
    name: "track",
    attributes: &[],
    children: &[
        ("name", Scalar("string")),
        ("cmt", Scalar("string")),
        ("desc", Scalar("string")),
        ("src", Scalar("string")),
        ("link", Repeated("link")),
        ("number", Scalar("unsigned")),
        ("type", Scalar("string")),
        ("extensions", Scalar("extensions")),
        ("trkseg", Repeated("segment")),
    ],
};

pub const TRACK_SEGMENT: Schema = Schema {
    name: "segment",
    attributes: &[],
    children: &[
        ("trkpt", Repeated("waypoint")),
        ("extensions", Scalar("extensions")),
    ],
};

pub const COPYRIGHT: Schema = Schema {
    name: "copyright",
    attributes: &[("author", "string")],
    children: &[("year", Scalar("year")), ("license", Scalar("uri"))],
};

pub const LINK: Schema = Schema {
    name: "link",
    attributes: &[("href", "uri")],
    children: &[("text", Scalar("string")), ("type", Scalar("string"))],
};

pub const PERSON: Schema = Schema {
    name: "person",
    attributes: &[],
    children: &[
        ("name", Scalar("string")),
        ("email", Scalar("email")),
        ("link", Structural("link")),
    ],
};

pub const POINT: Schema = Schema {
    name: "point",
    attributes: &[("lat", "latitude"), ("lon", "longitude")],
    children: &[("ele", Scalar("decimal")), ("time", Scalar("datetime"))],
};

pub const POINT_SEGMENT: Schema = Schema {
    name: "ptseg",
    attributes: &[],
    children: &[("pt", Repeated("point"))],
};

pub const BOUNDS: Schema = Schema {
    name: "bounds",
    attributes: &[
        ("minlat", "latitude"),
        ("minlon", "longitude"),
        ("maxlat", "latitude"),
        ("maxlon", "longitude"),
    ],
    children: &[],
};

/// Every structural schema.
pub const ALL: &[&Schema] = &[
    &GPX,
    &METADATA,
    &WAYPOINT,
    &ROUTE,
    &TRACK,
    &TRACK_SEGMENT,
    &COPYRIGHT,
    &LINK,
    &PERSON,
    &POINT,
    &POINT_SEGMENT,
    &BOUNDS,
];

/// Look up a structural type by name.
pub fn lookup(type_name: &str) -> Option<&'static Schema> {
    ALL.iter().copied().find(|schema| schema.name == type_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::CoercionRegistry;

    #[test]
    fn lookup_finds_every_schema() {
        for schema in ALL {
            assert_eq!(lookup(schema.name), Some(*schema));
        }
        assert!(lookup("decimal").is_none());
    }

    #[test]
    fn table_is_consistent_with_registry() {
        let registry = CoercionRegistry::standard();
        for name in registry.type_names() {
            assert!(lookup(name).is_none(), "{name} is both scalar and structural");
        }
        for schema in ALL {
            for (attribute, type_name) in schema.attributes {
                assert!(
                    registry.contains(type_name),
                    "{}.@{attribute} names unknown scalar {type_name}",
                    schema.name
                );
            }
            for (tag, field) in schema.children {
                let resolved = match field {
                    FieldType::Scalar(name) => registry.contains(name),
                    FieldType::Structural(name) | FieldType::Repeated(name) => {
                        lookup(name).is_some()
                    }
                };
                assert!(resolved, "{}.{tag} names unknown type {field:?}", schema.name);
            }
        }
    }

    #[test]
    fn header_is_root_minus_collections() {
        assert_eq!(GPX_HEADER.attributes, GPX.attributes);
        assert!(GPX_HEADER.multi_tags().is_empty());
        for (tag, field) in GPX_HEADER.children {
            assert_eq!(GPX.child(tag), Some(*field));
        }
        assert_eq!(lookup("gpx"), Some(&GPX));
    }

    #[test]
    fn partitions_single_and_multi_tags() {
        assert_eq!(ROUTE.multi_tags(), ["link", "rtept"]);
        assert!(ROUTE.single_tags().contains(&"name"));
        assert!(!ROUTE.single_tags().contains(&"rtept"));
        assert!(BOUNDS.single_tags().is_empty());
        assert_eq!(PERSON.child("link"), Some(FieldType::Structural("link")));
    }
}
