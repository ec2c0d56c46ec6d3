use thiserror::Error;

/// Errors raised when converting generic records into typed records.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// A field required by the typed record is absent or null.
    #[error("{record} is missing required field '{field}'")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    /// A field is present but cannot be represented by the typed record.
    #[error("{record} field '{field}' is invalid: {reason}")]
    InvalidField {
        record: &'static str,
        field: &'static str,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
