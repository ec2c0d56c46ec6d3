//! GPX 1.1 track-log reader.
//!
//! Turns a namespaced element tree into validated records. The reader is a
//! small interpreter over a declarative schema table: each structural type
//! lists its attributes and children with their types, and the interpreter
//! dispatches scalar fields to a coercion registry and recurses into nested
//! and repeated ones.
//!
//! # Features
//!
//! - Scalar validation: decimal syntax, degree/latitude/longitude ranges,
//!   DGPS station ids, fix types, timestamps, email reconstruction
//! - Lazy collection views over waypoints, routes and tracks that memoize
//!   each parsed item, so repeated traversals never reparse
//! - Pluggable coercions through [`CoercionRegistry`]
//! - Typed conversion into [`gpx_model`] structs
//!
//! # Example
//!
//! ```
//! use gpx_reader::Document;
//! use gpx_model::Waypoint;
//!
//! let document: Document = r#"
//!     <gpx xmlns="http://www.topografix.com/GPX/1/1" version="1.1" creator="demo">
//!       <wpt lat="47.6" lon="-122.3"><ele>12.5</ele></wpt>
//!       <wpt lat="47.7" lon="-122.4"><ele>13</ele></wpt>
//!     </gpx>"#
//!     .parse()
//!     .unwrap();
//!
//! let waypoints: Vec<Waypoint> = document
//!     .waypoints()
//!     .unwrap()
//!     .typed()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(waypoints.len(), 2);
//! assert_eq!(waypoints[0].elevation, Some(12.5));
//! ```
//!
//! # Errors
//!
//! Parsing is lazy: a malformed field only surfaces when the item containing
//! it is iterated. See [`GpxError`] for the error kinds and
//! [`InvalidItemPolicy`] for skipping bad items instead.

pub mod classify;
pub mod coerce;
mod document;
mod error;
pub mod interpret;
mod options;
pub mod schema;
pub mod timestamp;
pub mod tree;
mod view;

// Re-export error types
pub use error::{GpxError, Result};

// Re-export configuration
pub use options::{InvalidItemPolicy, ReaderOptions};

// Re-export the engine
pub use classify::{Classification, Multiplicity, classify};
pub use coerce::{CoercionRegistry, RawInput, ScalarCoercion, default_registry};
pub use interpret::Interpreter;
pub use schema::{FieldType, GPX_NAMESPACE, SUPPORTED_VERSION, Schema};
pub use view::{CacheSlot, Collection, CollectionCache, CollectionView};

// Re-export the facade
pub use document::{Document, read_gpx};
