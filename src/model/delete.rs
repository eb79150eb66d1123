//! Delete operations: `delete` and `delete_all`.

use super::ModelEngine;
use crate::error::ModelResult;
use crate::hooks::{events, HookArgs};
use log::{info, warn};
use serde_json::{Map, Value};

impl ModelEngine {
    /// Delete a single record by its identity value.
    ///
    /// The `delete` notify hook receives the identity mutably; clearing it
    /// to null aborts the delete. That is a supported control mechanism,
    /// not a failure - a hook can redirect the delete into a soft-delete
    /// save this way.
    pub fn delete(&mut self, id: &Value) -> ModelResult<bool> {
        let schema = self.require_schema()?;

        let mut args = HookArgs::new().with_id(id.clone());
        self.hooks.trigger(events::DELETE, &mut args);
        if args.id.is_null() {
            warn!("model {}: delete aborted by hook", schema.model);
            return Ok(false);
        }

        let deleted = self
            .store
            .delete_by_id(&schema.table, &schema.id_field, &args.id)?;

        let mut post = HookArgs::new().with_id(args.id);
        self.hooks.trigger(events::DELETED, &mut post);
        Ok(deleted)
    }

    /// Delete every record matching the filter.
    ///
    /// Resolves the matching set through `get_all`, then deletes row by
    /// row. Returns the number of successful deletions, which can be lower
    /// than the matched count when per-record hooks abort individual
    /// deletes.
    pub fn delete_all(
        &mut self,
        where_clause: Option<Map<String, Value>>,
        order_by: Option<String>,
    ) -> ModelResult<u64> {
        let schema = self.require_schema()?;

        let mut args = HookArgs::new()
            .with_filter(where_clause.unwrap_or_default())
            .with_order_by(order_by);
        self.hooks.trigger(events::DELETE_ALL, &mut args);

        let filter = (!args.filter.is_empty()).then_some(args.filter);
        let rows = self.get_all(filter, args.order_by, None, None)?;
        if rows.is_empty() {
            return Ok(0);
        }

        let mut deleted = 0;
        for row in rows {
            let id = row.get(&schema.id_field).cloned().unwrap_or(Value::Null);
            if self.delete(&id)? {
                deleted += 1;
            }
        }
        info!(
            "model {}: delete_all removed {} records",
            schema.model, deleted
        );
        Ok(deleted)
    }
}
