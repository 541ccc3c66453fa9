//! Configuration schema.
//!
//! Everything in this module is pure data: the records that make up the
//! persisted settings document, their defaults, and the validation that turns
//! a parsed JSON value into a typed [`root::RootConfig`].  Reading and writing
//! files lives in [`crate::infrastructure::storage`].

use thiserror::Error;

pub mod camera;
pub mod capture_source;
mod coerce;
pub mod eye;
pub mod root;
pub mod settings;

/// A well-formed JSON value that does not fit the settings schema.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The document root (or a nested record) is not a JSON object.
    #[error("settings document must be a JSON object, found {found}")]
    NotAnObject {
        /// JSON type name of the value that was found instead.
        found: &'static str,
    },

    /// A field holds a value that cannot be converted to its declared type.
    ///
    /// When decoded from raw bytes the message carries the line and column
    /// of the offending value.
    #[error("invalid settings field: {0}")]
    Field(#[from] serde_json::Error),

    /// A floating-point field is NaN or infinite and cannot be stored as JSON.
    #[error("field `{field}` must be finite, found {value}")]
    NonFinite { field: &'static str, value: f64 },

    /// A decimal string field (e.g. `gui_min_cutoff`) does not parse as a number.
    #[error("field `{field}` is not a decimal number: {value:?}")]
    Decimal {
        field: &'static str,
        value: String,
    },
}

/// Returns the JSON type name of `value`, for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
