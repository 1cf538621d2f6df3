//! Error types for the schema module.

use thiserror::Error;

/// Errors that can occur while loading a tracker schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema document not found on disk.
    #[error("Tracker schema not found: {0}")]
    FileNotFound(String),

    /// Schema document is not valid JSON or has the wrong shape.
    #[error("Failed to parse tracker schema: {0}")]
    ParseError(String),

    /// A field declares a value type this engine does not know.
    #[error("Unknown value type '{tag}' for field '{field}'")]
    UnknownValueType { field: String, tag: String },

    /// Schema is well-formed but internally inconsistent.
    #[error("Tracker schema validation failed: {0}")]
    ValidationError(String),

    /// I/O error while reading the schema.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SchemaError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::ValidationError(reason.into())
    }
}
