//! Schema definition and normalization.
//!
//! A raw schema is a JSON object mixing meta-entries (`_model`, `_table`,
//! `_id`) with field descriptors. The normalizer resolves the meta-entries,
//! stamps derived attributes onto every field and produces the canonical
//! [`Schema`](types::Schema) the rest of the engine works from.

pub mod normalizer;
pub mod types;

pub use normalizer::{normalize, schema_view, META_ID, META_MODEL, META_TABLE};
pub use types::{FieldDef, Schema, SchemaError};
