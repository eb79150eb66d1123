use crate::schema::types::Schema;
use log::debug;
use serde_json::{Map, Value};

/// The operation a candidate field map is being scoped for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Field used as a filter predicate (`allow_query` gates it)
    Filter,
    /// Field set during a create (`allow_create` gates it)
    Create,
    /// Field updated during a save (`allow_save` gates it)
    Save,
    /// Field returned in a row (`allow_get` gates it)
    Output,
}

/// Return the candidate map reduced to the fields permitted for `kind`.
///
/// Candidates not declared in the schema are dropped without error. For
/// [`AccessKind::Filter`], a key of the form `"<field> <operator>"` is a
/// conditional predicate: the base field name is what gets checked, the
/// compound key is preserved in the output.
pub fn filter_fields(
    schema: &Schema,
    candidates: &Map<String, Value>,
    kind: AccessKind,
) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in candidates {
        let base = match kind {
            AccessKind::Filter => split_condition(key).0,
            _ => key.as_str(),
        };

        let Some(def) = schema.field(base) else {
            debug!("model {}: dropping undeclared field {}", schema.model, base);
            continue;
        };

        let denied = match kind {
            AccessKind::Filter => def.allow_query == Some(false),
            AccessKind::Create => def.allow_create == Some(false),
            AccessKind::Save => def.allow_save == Some(false),
            AccessKind::Output => def.allow_get == Some(false),
        };
        if denied {
            debug!(
                "model {}: field {} denied for {:?}",
                schema.model, base, kind
            );
            continue;
        }

        out.insert(key.clone(), value.clone());
    }
    out
}

/// Split a `"<field> <operator>"` filter key into its parts.
///
/// Keys without a space are plain equality predicates on the whole key.
pub fn split_condition(key: &str) -> (&str, Option<&str>) {
    match key.rsplit_once(' ') {
        Some((field, op)) if !field.is_empty() && !op.is_empty() => (field, Some(op)),
        _ => (key, None),
    }
}
