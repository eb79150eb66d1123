use std::fmt;

/// Fatal schema misconfiguration.
///
/// Every variant aborts engine initialization; none of them is recoverable
/// at runtime.
#[derive(Debug, Clone)]
pub enum SchemaError {
    /// No schema was supplied, or the supplied schema is empty
    Missing(String),
    /// The identity pointer references a field that does not exist
    InvalidField(String),
    /// Neither the schema nor the host configuration resolves a required name
    Unresolved(String),
    /// The raw schema or a hook-transformed schema is structurally malformed
    InvalidData(String),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SchemaError::Missing(msg) => write!(f, "Missing schema: {}", msg),
            SchemaError::InvalidField(msg) => write!(f, "Invalid field: {}", msg),
            SchemaError::Unresolved(msg) => write!(f, "Unresolved name: {}", msg),
            SchemaError::InvalidData(msg) => write!(f, "Invalid data: {}", msg),
        }
    }
}

impl std::error::Error for SchemaError {}
