//! Error types for the gstmeta-core library.
//!
//! Extraction itself never fails: every input maps to some `ExtractedMeta`.
//! These errors cover the edges around it, parsing typed values out of
//! strings and loading configuration.

use thiserror::Error;

/// Main error type for the gstmeta library.
#[derive(Error, Debug)]
pub enum GstMetaError {
    /// Typed value could not be parsed.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when converting extracted text into typed values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Month token is not a known month name or abbreviation.
    #[error("unrecognized month: {0}")]
    InvalidMonth(String),

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

impl ExtractionError {
    pub(crate) fn parse(field: &str, value: &str) -> Self {
        ExtractionError::Parse {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for the gstmeta library.
pub type Result<T> = std::result::Result<T, GstMetaError>;
