//! Test support utilities.
//!
//! [`MemoryStore`] is an in-memory [`RecordStore`] with per-method call
//! counters, so tests can assert not only what the engine returns but also
//! whether it reached the store at all (cache behavior, filtered-out
//! writes, hook-aborted deletes).

use crate::error::ModelResult;
use crate::store::{apply_window, matches_filter, sort_rows, RecordStore};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// In-memory record store with instrumented call counts.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: AtomicU64,
    select_one_calls: AtomicU64,
    select_many_calls: AtomicU64,
    insert_calls: AtomicU64,
    update_calls: AtomicU64,
    delete_calls: AtomicU64,
    count_calls: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preload a table with rows.
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        let mut tables = self.tables.lock().expect("tables lock");
        tables.entry(table.to_string()).or_default().extend(rows);
    }

    /// Snapshot of a table's current rows.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        let tables = self.tables.lock().expect("tables lock");
        tables.get(table).cloned().unwrap_or_default()
    }

    pub fn select_one_calls(&self) -> u64 {
        self.select_one_calls.load(Ordering::SeqCst)
    }

    pub fn select_many_calls(&self) -> u64 {
        self.select_many_calls.load(Ordering::SeqCst)
    }

    pub fn insert_calls(&self) -> u64 {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> u64 {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> u64 {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn count_calls(&self) -> u64 {
        self.count_calls.load(Ordering::SeqCst)
    }

    fn find_index(rows: &[Value], id_field: &str, id: &Value) -> Option<usize> {
        rows.iter().position(|row| row.get(id_field) == Some(id))
    }
}

impl RecordStore for MemoryStore {
    fn select_one(&self, table: &str, filter: &Map<String, Value>) -> ModelResult<Option<Value>> {
        self.select_one_calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|row| matches_filter(row, filter)).cloned()))
    }

    fn select_many(
        &self,
        table: &str,
        filter: &Map<String, Value>,
        order_by: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ModelResult<Vec<Value>> {
        self.select_many_calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().expect("tables lock");
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filter(row, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
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
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let id = Value::from(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut stored = record.clone();
        stored.insert(id_field.to_string(), id.clone());

        let mut tables = self.tables.lock().expect("tables lock");
        tables
            .entry(table.to_string())
            .or_default()
            .push(Value::Object(stored));
        Ok(id)
    }

    fn update_by_id(
        &self,
        table: &str,
        id_field: &str,
        id: &Value,
        record: &Map<String, Value>,
    ) -> ModelResult<bool> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().expect("tables lock");
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };
        let Some(index) = Self::find_index(rows, id_field, id) else {
            return Ok(false);
        };
        if let Some(obj) = rows[index].as_object_mut() {
            for (field, value) in record {
                obj.insert(field.clone(), value.clone());
            }
        }
        Ok(true)
    }

    fn delete_by_id(&self, table: &str, id_field: &str, id: &Value) -> ModelResult<bool> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.tables.lock().expect("tables lock");
        let Some(rows) = tables.get_mut(table) else {
            return Ok(false);
        };
        match Self::find_index(rows, id_field, id) {
            Some(index) => {
                rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn count_matching(&self, table: &str, filter: &Map<String, Value>) -> ModelResult<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock().expect("tables lock");
        Ok(tables
            .get(table)
            .map(|rows| rows.iter().filter(|row| matches_filter(row, filter)).count() as u64)
            .unwrap_or(0))
    }
}
