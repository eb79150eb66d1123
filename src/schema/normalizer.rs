//! Raw schema normalization.
//!
//! Normalization extracts the meta-entries from the raw field map, stamps
//! derived attributes onto every descriptor, resolves the permission
//! aliases and validates the identity pointer. It is pure; the engine
//! memoizes the result and runs the `schema_loaded` hook around it.

use crate::schema::types::{FieldDef, Schema, SchemaError, TYPE_PRIMARY_KEY};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Meta-entry naming the entity.
pub const META_MODEL: &str = "_model";
/// Meta-entry naming the backing table.
pub const META_TABLE: &str = "_table";
/// Meta-entry pointing at the identity field.
pub const META_ID: &str = "_id";

/// Default type tag for fields that declare none.
const DEFAULT_TYPE: &str = "varchar";

/// Normalize a raw schema into its canonical form.
///
/// `default_model` and `default_table` are the host-supplied fallbacks used
/// when the schema omits `_model`/`_table`. Fails fatally when no schema is
/// supplied, when the identity pointer is absent or dangling, or when
/// entity/table names cannot be resolved.
pub fn normalize(
    raw: &Value,
    default_model: Option<&str>,
    default_table: Option<&str>,
) -> Result<Schema, SchemaError> {
    let entries = match raw {
        Value::Object(map) if !map.is_empty() => map,
        Value::Object(_) | Value::Null => {
            return Err(SchemaError::Missing(
                "no schema supplied by the schema source".to_string(),
            ))
        }
        other => {
            return Err(SchemaError::InvalidData(format!(
                "raw schema must be an object, got {}",
                type_name(other)
            )))
        }
    };

    let id_field = match entries.get(META_ID) {
        Some(Value::String(name)) => name.clone(),
        Some(other) => {
            return Err(SchemaError::InvalidData(format!(
                "{} must be a field name string, got {}",
                META_ID,
                type_name(other)
            )))
        }
        None => {
            return Err(SchemaError::Missing(format!(
                "{} is unset; it must point at the identity field",
                META_ID
            )))
        }
    };

    let model = resolve_name(entries, META_MODEL, default_model).ok_or_else(|| {
        SchemaError::Unresolved("entity name is neither in the schema nor configured".to_string())
    })?;
    let table = resolve_name(entries, META_TABLE, default_table).ok_or_else(|| {
        SchemaError::Unresolved(format!("table is not set for model {}", model))
    })?;

    let mut fields = BTreeMap::new();
    for (name, value) in entries {
        if name.starts_with('_') {
            continue;
        }
        let mut def: FieldDef = serde_json::from_value(value.clone()).map_err(|e| {
            SchemaError::InvalidData(format!("field {} has a malformed descriptor: {}", name, e))
        })?;
        def.field = name.clone();

        if def.field_type.is_none() {
            def.field_type = Some(DEFAULT_TYPE.to_string());
        } else if def.is_primary_key() {
            def.allow_create = Some(false);
            def.allow_save = Some(false);
        }

        // Aliases resolve exactly once; an explicitly set canonical flag wins.
        if def.readonly == Some(true) && def.allow_save.is_none() {
            def.allow_save = Some(false);
        }
        def.readonly = None;
        if def.hide == Some(true) && def.allow_get.is_none() {
            def.allow_get = Some(false);
        }
        def.hide = None;

        fields.insert(name.clone(), def);
    }

    if !fields.contains_key(&id_field) {
        return Err(SchemaError::InvalidField(format!(
            "{} for model {} points at non-existent field {}",
            META_ID, model, id_field
        )));
    }

    let mut schema = Schema {
        model,
        table,
        id_field,
        fields,
        hidden: Vec::new(),
    };
    schema.refresh_hidden();
    Ok(schema)
}

/// Rebuild the caller-facing view of a normalized schema.
///
/// The view carries the meta-entries alongside the field descriptors, with
/// the identity resolved back down to its plain field name.
pub fn schema_view(schema: &Schema) -> Result<Value, SchemaError> {
    let mut view = Map::new();
    view.insert(META_MODEL.to_string(), Value::String(schema.model.clone()));
    view.insert(META_TABLE.to_string(), Value::String(schema.table.clone()));
    view.insert(META_ID.to_string(), Value::String(schema.id_field.clone()));
    for (name, def) in &schema.fields {
        let value = serde_json::to_value(def).map_err(|e| {
            SchemaError::InvalidData(format!("field {} cannot be serialized: {}", name, e))
        })?;
        view.insert(name.clone(), value);
    }
    Ok(Value::Object(view))
}

fn resolve_name(
    entries: &Map<String, Value>,
    meta: &str,
    default: Option<&str>,
) -> Option<String> {
    match entries.get(meta) {
        Some(Value::String(name)) if !name.is_empty() => Some(name.clone()),
        _ => default.map(str::to_string),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
