//! Error types for the GPX reader.
//!
//! One enum covers every stage: loading the tree, checking the root element,
//! and coercing values. Coercion errors propagate unchanged from the failing
//! scalar up through every enclosing record to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or interpreting a GPX document.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GpxError {
    // =========================================================================
    // VALUE ERRORS
    // =========================================================================
    /// Malformed scalar text, e.g. a non-numeric decimal.
    #[error("invalid {type_name} value: {value:?}")]
    InvalidValue {
        type_name: &'static str,
        value: String,
    },

    /// A validating coercion received no input (missing attribute or empty element).
    #[error("missing {type_name} value")]
    MissingValue { type_name: &'static str },

    /// Numeric value outside its closed interval.
    #[error("{type_name} value {value} out of range [{min}, {max}]")]
    OutOfRange {
        type_name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Token outside a fixed enumeration.
    #[error("{value:?} is not a valid {type_name}")]
    InvalidEnum {
        type_name: &'static str,
        value: String,
    },

    /// Timestamp text rejected by the timestamp parser.
    #[error("invalid timestamp {value:?}: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    // =========================================================================
    // DOCUMENT ERRORS
    // =========================================================================
    /// Declared document version differs from the supported one.
    #[error(
        "unsupported GPX version {} (expected {supported})",
        .found.as_deref().unwrap_or("<none>")
    )]
    UnsupportedVersion {
        found: Option<String>,
        supported: &'static str,
    },

    /// Root element is not the namespaced GPX root.
    #[error("not a GPX document: root element is {tag}")]
    NotAGpxDocument { tag: String },

    /// A schema references a type name missing from the expected table.
    #[error("unknown {expected} type: {type_name}")]
    UnknownType {
        type_name: String,
        expected: &'static str,
    },

    /// Typed conversion of a parsed record failed.
    #[error(transparent)]
    Model(#[from] gpx_model::ModelError),

    // =========================================================================
    // LOADING ERRORS
    // =========================================================================
    /// Markup could not be tokenized.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Entity or character reference could not be resolved.
    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Markup is not valid UTF-8.
    #[error("encoding error: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Markup is well-formed token by token but does not form a single tree.
    #[error("malformed document: {message}")]
    MalformedDocument { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, GpxError>;

impl GpxError {
    /// Create an InvalidValue error.
    pub fn invalid_value(type_name: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            type_name,
            value: value.into(),
        }
    }

    /// Create an OutOfRange error.
    pub fn out_of_range(type_name: &'static str, value: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange {
            type_name,
            value,
            min,
            max,
        }
    }

    /// Create a MalformedDocument error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument {
            message: message.into(),
        }
    }

    /// True if the error came from validating a value rather than loading the document.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidValue { .. }
                | Self::MissingValue { .. }
                | Self::OutOfRange { .. }
                | Self::InvalidEnum { .. }
                | Self::InvalidTimestamp { .. }
        )
    }
}
