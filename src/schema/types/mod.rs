pub mod errors;
pub mod fields;
pub mod schema;

pub use errors::SchemaError;
pub use fields::{FieldDef, TYPE_PRIMARY_KEY};
pub use schema::Schema;
