//! The record store seam.
//!
//! The engine delegates all persistence to a [`RecordStore`]. The trait is
//! deliberately small: single and multi select with filters, insert, update
//! and delete by identity, and counting. Filter and ordering evaluation
//! helpers live here so every store interprets criteria identically.

pub mod sled_store;

pub use sled_store::SledStore;

use crate::error::ModelResult;
use crate::permissions::split_condition;
use serde_json::{Map, Value};
use std::cmp::Ordering;

/// Injected query-execution capability.
///
/// Implementations take `&self`; any internal mutability is their own
/// concern. Errors propagate to the engine unmodified.
pub trait RecordStore: Send + Sync {
    /// First record matching the filter, if any.
    fn select_one(&self, table: &str, filter: &Map<String, Value>) -> ModelResult<Option<Value>>;

    /// All records matching the filter, ordered and windowed.
    fn select_many(
        &self,
        table: &str,
        filter: &Map<String, Value>,
        order_by: Option<&str>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> ModelResult<Vec<Value>>;

    /// Persist a new record; the store generates and returns the identity
    /// value, stamped into the record under `id_field`.
    fn insert(&self, table: &str, id_field: &str, record: &Map<String, Value>)
        -> ModelResult<Value>;

    /// Merge `record` into the record addressed by `id`. `false` when no
    /// such record exists.
    fn update_by_id(
        &self,
        table: &str,
        id_field: &str,
        id: &Value,
        record: &Map<String, Value>,
    ) -> ModelResult<bool>;

    /// Remove the record addressed by `id`. `false` when no such record
    /// exists.
    fn delete_by_id(&self, table: &str, id_field: &str, id: &Value) -> ModelResult<bool>;

    /// Number of records matching the filter.
    fn count_matching(&self, table: &str, filter: &Map<String, Value>) -> ModelResult<u64>;
}

/// Comparison operator of a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    /// Parse an operator token from a compound filter key.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "=" => Some(Comparison::Eq),
            "!=" | "<>" => Some(Comparison::Ne),
            ">" => Some(Comparison::Gt),
            ">=" => Some(Comparison::Ge),
            "<" => Some(Comparison::Lt),
            "<=" => Some(Comparison::Le),
            _ => None,
        }
    }

    /// Evaluate the predicate for one record value.
    pub fn evaluate(&self, actual: &Value, expected: &Value) -> bool {
        match self {
            Comparison::Eq => actual == expected,
            Comparison::Ne => actual != expected,
            ordered => match compare_values(actual, expected) {
                Some(ord) => match ordered {
                    Comparison::Gt => ord == Ordering::Greater,
                    Comparison::Ge => ord != Ordering::Less,
                    Comparison::Lt => ord == Ordering::Less,
                    Comparison::Le => ord != Ordering::Greater,
                    _ => false,
                },
                None => false,
            },
        }
    }
}

/// Whether a record satisfies every predicate of a filter map.
pub fn matches_filter(record: &Value, filter: &Map<String, Value>) -> bool {
    filter.iter().all(|(key, expected)| {
        let (field, op) = split_condition(key);
        let comparison = op.and_then(Comparison::parse).unwrap_or(Comparison::Eq);
        let actual = record.get(field).unwrap_or(&Value::Null);
        comparison.evaluate(actual, expected)
    })
}

/// Sort rows in place by an `"<field>"` or `"<field> desc"` criterion.
pub fn sort_rows(rows: &mut [Value], order_by: &str) {
    let mut parts = order_by.split_whitespace();
    let Some(field) = parts.next() else {
        return;
    };
    let descending = parts
        .next()
        .is_some_and(|token| token.eq_ignore_ascii_case("desc"));

    rows.sort_by(|a, b| {
        let left = a.get(field).unwrap_or(&Value::Null);
        let right = b.get(field).unwrap_or(&Value::Null);
        compare_values(left, right).unwrap_or(Ordering::Equal)
    });
    if descending {
        rows.reverse();
    }
}

/// Window a row list with an optional offset and limit.
pub fn apply_window(rows: Vec<Value>, limit: Option<u64>, offset: Option<u64>) -> Vec<Value> {
    let skip = offset.unwrap_or(0) as usize;
    let take = limit.map_or(usize::MAX, |l| l as usize);
    rows.into_iter().skip(skip).take(take).collect()
}

/// Order two JSON values: numerically when both are numbers, by string
/// comparison otherwise. `None` when the values are not comparable.
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Null, _) => Some(Ordering::Less),
        (_, Value::Null) => Some(Ordering::Greater),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filter(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object")
    }

    #[test]
    fn equality_is_the_default_predicate() {
        let record = json!({"status": "active", "age": 30});
        assert!(matches_filter(&record, &filter(json!({"status": "active"}))));
        assert!(!matches_filter(&record, &filter(json!({"status": "gone"}))));
    }

    #[test]
    fn compound_keys_apply_their_operator() {
        let record = json!({"age": 30});
        assert!(matches_filter(&record, &filter(json!({"age >": 20}))));
        assert!(matches_filter(&record, &filter(json!({"age <=": 30}))));
        assert!(matches_filter(&record, &filter(json!({"age !=": 31}))));
        assert!(!matches_filter(&record, &filter(json!({"age <": 30}))));
    }

    #[test]
    fn missing_fields_compare_as_null() {
        let record = json!({"age": 30});
        assert!(matches_filter(&record, &filter(json!({"ghost": null}))));
        assert!(!matches_filter(&record, &filter(json!({"ghost": "x"}))));
    }

    #[test]
    fn ordered_comparison_across_types_never_matches() {
        let record = json!({"age": "thirty"});
        assert!(!matches_filter(&record, &filter(json!({"age >": 20}))));
    }

    #[test]
    fn sort_rows_handles_desc_suffix() {
        let mut rows = vec![json!({"n": 2}), json!({"n": 3}), json!({"n": 1})];
        sort_rows(&mut rows, "n");
        assert_eq!(rows[0]["n"], json!(1));
        sort_rows(&mut rows, "n desc");
        assert_eq!(rows[0]["n"], json!(3));
    }

    #[test]
    fn window_applies_offset_then_limit() {
        let rows: Vec<Value> = (0..5).map(|n| json!(n)).collect();
        let windowed = apply_window(rows, Some(2), Some(1));
        assert_eq!(windowed, vec![json!(1), json!(2)]);
    }
}
