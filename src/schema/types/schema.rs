use super::fields::FieldDef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The canonical, normalized schema the engine works from.
///
/// The identity is stored as the name of its field; wherever the identity
/// descriptor is needed it is resolved by lookup in `fields`, never by
/// aliasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Entity name
    pub model: String,
    /// Backing table/collection name
    pub table: String,
    /// Name of the identity field; guaranteed to exist in `fields`
    pub id_field: String,
    /// Field descriptors keyed by field name
    pub fields: BTreeMap<String, FieldDef>,
    /// Names of all fields with `allow_get = false`, stripped from output
    pub hidden: Vec<String>,
}

impl Schema {
    /// Look up a field descriptor by name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }

    /// The identity field's descriptor.
    pub fn id_def(&self) -> Option<&FieldDef> {
        self.fields.get(&self.id_field)
    }

    /// Rebuild `hidden` from the current field flags.
    ///
    /// Must run after any transformation of `fields` so the list never
    /// disagrees with the flags it is derived from.
    pub fn refresh_hidden(&mut self) {
        self.hidden = self
            .fields
            .iter()
            .filter(|(_, def)| def.is_hidden())
            .map(|(name, _)| name.clone())
            .collect();
    }
}
