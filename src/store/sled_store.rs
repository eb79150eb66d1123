//! Sled-backed record store.
//!
//! One tree per table, records as JSON bytes keyed by their rendered
//! identity value. Writes flush before returning so the data is durably on
//! disk.

use super::{apply_window, matches_filter, sort_rows, RecordStore};
use crate::error::ModelResult;
use serde_json::{Map, Value};
use std::path::Path;
use uuid::Uuid;

/// A [`RecordStore`] persisting records in an embedded sled database.
#[derive(Clone)]
pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    /// Wrap an already opened sled database.
    pub fn new(db: sled::Db) -> Self {
        Self { db }
    }

    /// Open (or create) a database at `path`.
    pub fn open(path: &Path) -> ModelResult<Self> {
        Ok(Self { db: sled::open(path)? })
    }

    /// Open an ephemeral database, dropped on close. Meant for tests and
    /// scratch usage.
    pub fn temporary() -> ModelResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn tree(&self, table: &str) -> ModelResult<sled::Tree> {
        Ok(self.db.open_tree(table)?)
    }

    /// Deserialize every record of a table that matches the filter.
    fn scan(&self, table: &str, filter: &Map<String, Value>) -> ModelResult<Vec<Value>> {
        let tree = self.tree(table)?;
        let mut rows = Vec::new();
        for entry in tree.iter() {
            let (_, bytes) = entry?;
            let record: Value = serde_json::from_slice(&bytes)?;
            if matches_filter(&record, filter) {
                rows.push(record);
            }
        }
        Ok(rows)
    }
}

fn record_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RecordStore for SledStore {
    fn select_one(&self, table: &str, filter: &Map<String, Value>) -> ModelResult<Option<Value>> {
        Ok(self.scan(table, filter)?.into_iter().next())
    }

    fn select_many(
        &self,
        table: &str,
        filter: &Map<String, Value>,
        order_by: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ModelResult<Vec<Value>> {
        let mut rows = self.scan(table, filter)?;
        if let Some(order_by) = order_by {
            sort_rows(&mut rows, order_by);
        }
        Ok(apply_window(rows, limit, offset))
    }

    fn insert(
        &self,
        table: &str,
        id_field: &str,
        record: &Map<String, Value>,
    ) -> ModelResult<Value> {
        let id = Value::String(Uuid::new_v4().to_string());
        let mut stored = record.clone();
        stored.insert(id_field.to_string(), id.clone());

        let tree = self.tree(table)?;
        let bytes = serde_json::to_vec(&Value::Object(stored))?;
        tree.insert(record_key(&id).as_bytes(), bytes)?;
        tree.flush()?;
        Ok(id)
    }

    fn update_by_id(
        &self,
        table: &str,
        _id_field: &str,
        id: &Value,
        record: &Map<String, Value>,
    ) -> ModelResult<bool> {
        let tree = self.tree(table)?;
        let key = record_key(id);
        let Some(bytes) = tree.get(key.as_bytes())? else {
            return Ok(false);
        };

        let mut existing: Value = serde_json::from_slice(&bytes)?;
        if let Some(obj) = existing.as_object_mut() {
            for (field, value) in record {
                obj.insert(field.clone(), value.clone());
            }
        }
        tree.insert(key.as_bytes(), serde_json::to_vec(&existing)?)?;
        tree.flush()?;
        Ok(true)
    }

    fn delete_by_id(&self, table: &str, _id_field: &str, id: &Value) -> ModelResult<bool> {
        let tree = self.tree(table)?;
        let existed = tree.remove(record_key(id).as_bytes())?.is_some();
        tree.flush()?;
        Ok(existed)
    }

    fn count_matching(&self, table: &str, filter: &Map<String, Value>) -> ModelResult<u64> {
        Ok(self.scan(table, filter)?.len() as u64)
    }
}
