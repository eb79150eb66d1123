use crate::schema::types::SchemaError;
use thiserror::Error;

/// Unified error type for the crate.
///
/// Each variant represents a category of failures, with enough context to
/// propagate to the caller. Store-layer errors are carried unmodified; the
/// engine performs no retry and no translation.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Errors raised while parsing or normalizing a schema
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Errors raised by the injected record store
    #[error("Store error: {0}")]
    Store(String),

    /// Errors related to engine configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Errors related to IO operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ModelError {
    fn from(error: serde_json::Error) -> Self {
        ModelError::Serialization(error.to_string())
    }
}

impl From<sled::Error> for ModelError {
    fn from(error: sled::Error) -> Self {
        ModelError::Store(error.to_string())
    }
}

/// Result type alias for operations that can result in a ModelError
pub type ModelResult<T> = Result<T, ModelError>;
