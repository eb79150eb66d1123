//! Persistence tests for the sled-backed record store, standalone and under
//! a full engine.

mod common;

use modelgate::{ModelConfig, ModelEngine, RecordStore, SledStore};
use serde_json::{json, Map, Value};
use std::sync::Arc;

fn record(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("record must be an object")
}

#[test]
fn insert_assigns_an_identity_and_round_trips() {
    let store = SledStore::temporary().expect("open");
    let id = store
        .insert("users", "id", &record(json!({"name": "Alice"})))
        .expect("insert");
    assert!(id.as_str().is_some_and(|s| !s.is_empty()));

    let mut filter = Map::new();
    filter.insert("id".to_string(), id.clone());
    let row = store
        .select_one("users", &filter)
        .expect("select_one")
        .expect("row");
    assert_eq!(row["name"], json!("Alice"));
    assert_eq!(row["id"], id);
}

#[test]
fn update_merges_into_the_existing_record() {
    let store = SledStore::temporary().expect("open");
    let id = store
        .insert("users", "id", &record(json!({"name": "Alice", "status": "active"})))
        .expect("insert");

    assert!(store
        .update_by_id("users", "id", &id, &record(json!({"status": "archived"})))
        .expect("update"));

    let mut filter = Map::new();
    filter.insert("id".to_string(), id);
    let row = store
        .select_one("users", &filter)
        .expect("select_one")
        .expect("row");
    assert_eq!(row["status"], json!("archived"));
    assert_eq!(row["name"], json!("Alice"), "untouched fields survive");

    assert!(!store
        .update_by_id("users", "id", &json!("missing"), &record(json!({"status": "x"})))
        .expect("update"));
}

#[test]
fn select_many_filters_orders_and_windows() {
    let store = SledStore::temporary().expect("open");
    for (name, rank) in [("Alice", 3), ("Bob", 1), ("Carol", 2)] {
        store
            .insert("users", "id", &record(json!({"name": name, "rank": rank})))
            .expect("insert");
    }

    let rows = store
        .select_many("users", &Map::new(), Some("rank"), None, None)
        .expect("select_many");
    let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
    assert_eq!(names, vec!["Bob", "Carol", "Alice"]);

    let rows = store
        .select_many("users", &Map::new(), Some("rank desc"), Some(1), Some(1))
        .expect("select_many");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], json!("Carol"));

    let rows = store
        .select_many("users", &record(json!({"rank >": 1})), None, None, None)
        .expect("select_many");
    assert_eq!(rows.len(), 2);
}

#[test]
fn delete_reports_whether_the_record_existed() {
    let store = SledStore::temporary().expect("open");
    let id = store
        .insert("users", "id", &record(json!({"name": "Alice"})))
        .expect("insert");

    assert!(store.delete_by_id("users", "id", &id).expect("delete"));
    assert!(!store.delete_by_id("users", "id", &id).expect("delete"));
    assert_eq!(
        store.count_matching("users", &Map::new()).expect("count"),
        0
    );
}

#[test]
fn tables_are_isolated_trees() {
    let store = SledStore::temporary().expect("open");
    store
        .insert("users", "id", &record(json!({"name": "Alice"})))
        .expect("insert");
    store
        .insert("groups", "id", &record(json!({"name": "admins"})))
        .expect("insert");

    assert_eq!(store.count_matching("users", &Map::new()).expect("count"), 1);
    assert_eq!(store.count_matching("groups", &Map::new()).expect("count"), 1);
}

#[test]
fn records_survive_reopening_the_database() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("records");

    let id = {
        let store = SledStore::open(&path).expect("open");
        store
            .insert("users", "id", &record(json!({"name": "Alice"})))
            .expect("insert")
    };

    let store = SledStore::open(&path).expect("reopen");
    let mut filter = Map::new();
    filter.insert("id".to_string(), id);
    let row = store
        .select_one("users", &filter)
        .expect("select_one")
        .expect("row");
    assert_eq!(row["name"], json!("Alice"));
}

#[test]
fn engine_runs_a_full_lifecycle_over_sled() {
    let store = Arc::new(SledStore::temporary().expect("open"));
    let mut engine = ModelEngine::new(
        ModelConfig::default(),
        common::user_schema,
        Arc::clone(&store) as Arc<dyn RecordStore>,
    );

    let id = engine
        .create(json!({"name": "Alice", "secret": "x", "status": "active"}))
        .expect("create")
        .expect("created");

    let row = engine.get(&id).expect("get").expect("row");
    assert_eq!(row["name"], json!("Alice"));
    assert!(row.get("secret").is_none());

    engine
        .save(&id, json!({"status": "archived"}))
        .expect("save")
        .expect("written");
    let rows = engine
        .get_all(
            Some(record(json!({"status": "archived"}))),
            None,
            None,
            None,
        )
        .expect("get_all");
    assert_eq!(rows.len(), 1);

    assert!(engine.delete(&id).expect("delete"));
    assert_eq!(engine.count(None).expect("count"), 0);
}
