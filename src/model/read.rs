//! Read-side operations: `get`, `get_by`, `get_all`, `each`/`map` and
//! `count`.

use super::ModelEngine;
use crate::cache::{self, OpKind};
use crate::error::{ModelError, ModelResult};
use crate::hooks::{events, HookArgs, HookRegistry};
use crate::permissions::{filter_fields, AccessKind};
use crate::schema::types::Schema;
use log::debug;
use serde_json::{json, Map, Value};

impl ModelEngine {
    /// Retrieve a single record by its identity value.
    ///
    /// The returned row has been through the `row` pipeline hook and had
    /// its hidden fields stripped. Misses are cached alongside hits.
    pub fn get(&mut self, id: &Value) -> ModelResult<Option<Value>> {
        let schema = self.require_schema()?;
        let key = cache::id_key(id);
        if let Some(hit) = self.cache.get(OpKind::Get, &key) {
            debug!("model {}: get cache hit for {}", schema.model, key);
            return Ok(row_from_cache(hit));
        }

        let mut filter = Map::new();
        filter.insert(schema.id_field.clone(), id.clone());
        let row = self.store.select_one(&schema.table, &filter)?;
        let shaped = row.map(|row| shape_row(&self.hooks, &schema, row));

        let cached = self
            .cache
            .set(OpKind::Get, key, shaped.unwrap_or(Value::Null));
        Ok(row_from_cache(cached))
    }

    /// Retrieve a single record by an arbitrary field.
    pub fn get_by(&mut self, field: &str, value: &Value) -> ModelResult<Option<Value>> {
        let schema = self.require_schema()?;
        let key = cache::field_key(field, value);
        if let Some(hit) = self.cache.get(OpKind::GetBy, &key) {
            debug!("model {}: get_by cache hit for {}", schema.model, key);
            return Ok(row_from_cache(hit));
        }

        let mut filter = Map::new();
        filter.insert(field.to_string(), value.clone());
        let row = self.store.select_one(&schema.table, &filter)?;
        let shaped = row.map(|row| shape_row(&self.hooks, &schema, row));

        let cached = self
            .cache
            .set(OpKind::GetBy, key, shaped.unwrap_or(Value::Null));
        Ok(row_from_cache(cached))
    }

    /// Retrieve every record matching the filter.
    ///
    /// The `get_all` notify hook runs first and may inject default
    /// constraints; the filter then goes through the field access filter,
    /// every returned row is shaped, and the `rows` pipeline hook gets the
    /// complete result set last.
    pub fn get_all(
        &mut self,
        where_clause: Option<Map<String, Value>>,
        order_by: Option<String>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ModelResult<Vec<Value>> {
        let schema = self.require_schema()?;

        // The key covers the caller's arguments, before any hook mangling.
        let cache_key = self
            .cache
            .is_enabled(OpKind::GetAll)
            .then(|| cache::digest_key(&json!([&where_clause, &order_by, &limit, &offset])));
        if let Some(key) = &cache_key {
            if let Some(hit) = self.cache.get(OpKind::GetAll, key) {
                debug!("model {}: get_all cache hit", schema.model);
                return rows_from_value(hit);
            }
        }

        let mut args = HookArgs::new()
            .with_filter(where_clause.unwrap_or_default())
            .with_order_by(order_by);
        args.limit = limit;
        args.offset = offset;
        self.hooks.trigger(events::GET_ALL, &mut args);

        let filter = filter_fields(&schema, &args.filter, AccessKind::Filter);
        let rows = self.store.select_many(
            &schema.table,
            &filter,
            args.order_by.as_deref(),
            args.limit,
            args.offset,
        )?;

        let shaped: Vec<Value> = rows
            .into_iter()
            .map(|row| shape_row(&self.hooks, &schema, row))
            .collect();
        let result = self
            .hooks
            .trigger_pipeline(events::ROWS, Value::Array(shaped));

        let result = match cache_key {
            Some(key) => self.cache.set(OpKind::GetAll, key, result),
            None => result,
        };
        rows_from_value(result)
    }

    /// Run `get_all` and apply a callback to every row.
    ///
    /// A row is excluded from the output when the callback returns `false`
    /// or leaves the row empty. Always returns a vector, possibly empty.
    pub fn each<F>(
        &mut self,
        where_clause: Option<Map<String, Value>>,
        mut callback: F,
    ) -> ModelResult<Vec<Value>>
    where
        F: FnMut(&mut Value) -> bool,
    {
        let rows = self.get_all(where_clause, None, None, None)?;
        let mut out = Vec::new();
        for mut row in rows {
            let keep = callback(&mut row);
            if !keep || is_falsy(&row) {
                continue;
            }
            out.push(row);
        }
        Ok(out)
    }

    /// Alias for [`each`](ModelEngine::each).
    pub fn map<F>(
        &mut self,
        where_clause: Option<Map<String, Value>>,
        callback: F,
    ) -> ModelResult<Vec<Value>>
    where
        F: FnMut(&mut Value) -> bool,
    {
        self.each(where_clause, callback)
    }

    /// Count the records matching the filter. Fires the same `get_all`
    /// notify hook as listing so injected default constraints apply.
    pub fn count(&mut self, where_clause: Option<Map<String, Value>>) -> ModelResult<u64> {
        let schema = self.require_schema()?;

        let cache_key = self
            .cache
            .is_enabled(OpKind::Count)
            .then(|| cache::digest_key(&json!([&where_clause])));
        if let Some(key) = &cache_key {
            if let Some(hit) = self.cache.get(OpKind::Count, key) {
                debug!("model {}: count cache hit", schema.model);
                return Ok(hit.as_u64().unwrap_or(0));
            }
        }

        let mut args = HookArgs::new().with_filter(where_clause.unwrap_or_default());
        self.hooks.trigger(events::GET_ALL, &mut args);

        let filter = filter_fields(&schema, &args.filter, AccessKind::Filter);
        let count = self.store.count_matching(&schema.table, &filter)?;

        if let Some(key) = cache_key {
            self.cache.set(OpKind::Count, key, Value::from(count));
        }
        Ok(count)
    }
}

/// Shape an outgoing row: `row` pipeline hook first, hidden-field stripping
/// second, so hooks still see the raw record.
pub(crate) fn shape_row(hooks: &HookRegistry, schema: &Schema, row: Value) -> Value {
    let row = hooks.trigger_pipeline(events::ROW, row);
    let Value::Object(mut map) = row else {
        return row;
    };
    for field in &schema.hidden {
        map.remove(field);
    }
    Value::Object(map)
}

fn row_from_cache(value: Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn rows_from_value(value: Value) -> ModelResult<Vec<Value>> {
    match value {
        Value::Array(rows) => Ok(rows),
        _ => Err(ModelError::Config(
            "rows hook replaced the result set with a non-array value".to_string(),
        )),
    }
}

fn is_falsy(row: &Value) -> bool {
    row.is_null() || row.as_object().is_some_and(Map::is_empty)
}
