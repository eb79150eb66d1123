use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved type tag marking a field as the table's primary key.
///
/// Primary-key fields are forced read-only and non-creatable during
/// normalization.
pub const TYPE_PRIMARY_KEY: &str = "pk";

/// A single field descriptor.
///
/// Raw descriptors may carry the `readonly` and `hide` aliases; the
/// normalizer resolves both into the canonical `allow_*` flags and clears
/// them. An absent `allow_*` flag means the operation is permitted; only an
/// explicit `false` denies it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// The field's own name, stamped during normalization
    #[serde(default)]
    pub field: String,

    /// Type tag; free-form apart from the reserved [`TYPE_PRIMARY_KEY`]
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,

    /// Fixed length of the field, where the backing column has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u64>,

    /// Enumeration values for presentation, either an array or a
    /// key-to-label map
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,

    /// Allow this field to be updated in a save operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_save: Option<bool>,

    /// Allow this field to be set in a create operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_create: Option<bool>,

    /// Allow this field to appear in returned rows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_get: Option<bool>,

    /// Allow this field to be used as a filter predicate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_query: Option<bool>,

    /// Alias for `allow_save = false`; consumed by the normalizer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,

    /// Alias for `allow_get = false`; consumed by the normalizer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
}

impl FieldDef {
    /// Whether this field is stripped from outgoing rows.
    pub fn is_hidden(&self) -> bool {
        self.allow_get == Some(false)
    }

    /// Whether this field carries the reserved primary-key type tag.
    pub fn is_primary_key(&self) -> bool {
        self.field_type.as_deref() == Some(TYPE_PRIMARY_KEY)
    }
}
