//! Result cache behavior observed through store call counters.

mod common;

use common::{filter, ModelFixture};
use modelgate::{CacheConfig, ModelConfig};
use serde_json::json;

fn listing_config() -> ModelConfig {
    ModelConfig::default().with_cache(CacheConfig {
        get: true,
        get_by: true,
        get_all: true,
        count: true,
    })
}

#[test]
fn repeated_get_reaches_the_store_once() {
    let mut fixture = ModelFixture::seeded();
    let first = fixture.engine.get(&json!(1)).expect("get");
    let second = fixture.engine.get(&json!(1)).expect("get");
    assert_eq!(first, second);
    assert_eq!(fixture.store.select_one_calls(), 1);
}

#[test]
fn a_miss_is_cached_like_a_hit() {
    let mut fixture = ModelFixture::seeded();
    assert!(fixture.engine.get(&json!(99)).expect("get").is_none());
    assert!(fixture.engine.get(&json!(99)).expect("get").is_none());
    assert_eq!(fixture.store.select_one_calls(), 1);
}

#[test]
fn distinct_identities_get_distinct_entries() {
    let mut fixture = ModelFixture::seeded();
    let alice = fixture.engine.get(&json!(1)).expect("get").expect("row");
    let bob = fixture.engine.get(&json!(2)).expect("get").expect("row");
    assert_ne!(alice["name"], bob["name"]);
    assert_eq!(fixture.store.select_one_calls(), 2);
    assert_eq!(fixture.engine.cache().len(), 2);
}

#[test]
fn get_by_keys_separate_fields_and_values() {
    let mut fixture = ModelFixture::seeded();
    fixture
        .engine
        .get_by("email", &json!("alice@example.com"))
        .expect("get_by");
    fixture
        .engine
        .get_by("email", &json!("bob@example.com"))
        .expect("get_by");
    fixture
        .engine
        .get_by("name", &json!("Alice"))
        .expect("get_by");
    assert_eq!(fixture.store.select_one_calls(), 3);

    // Every lookup above is now warm.
    fixture
        .engine
        .get_by("email", &json!("alice@example.com"))
        .expect("get_by");
    fixture.engine.get_by("name", &json!("Alice")).expect("get_by");
    assert_eq!(fixture.store.select_one_calls(), 3);
}

#[test]
fn listing_is_uncached_by_default() {
    let mut fixture = ModelFixture::seeded();
    fixture.engine.get_all(None, None, None, None).expect("get_all");
    fixture.engine.get_all(None, None, None, None).expect("get_all");
    assert_eq!(fixture.store.select_many_calls(), 2);
    assert!(fixture.engine.cache().is_empty());
}

#[test]
fn listing_caches_on_the_full_argument_tuple_when_enabled() {
    let mut fixture = ModelFixture::with_config(listing_config());
    fixture.store.seed("users", common::sample_users());

    let args = (
        Some(filter(json!({"status": "active"}))),
        Some("name".to_string()),
    );
    let first = fixture
        .engine
        .get_all(args.0.clone(), args.1.clone(), None, None)
        .expect("get_all");
    let second = fixture
        .engine
        .get_all(args.0.clone(), args.1.clone(), None, None)
        .expect("get_all");
    assert_eq!(first, second);
    assert_eq!(fixture.store.select_many_calls(), 1);

    // Any argument change is a different key.
    fixture
        .engine
        .get_all(args.0.clone(), args.1.clone(), Some(1), None)
        .expect("get_all");
    fixture
        .engine
        .get_all(Some(filter(json!({"status": "archived"}))), args.1, None, None)
        .expect("get_all");
    assert_eq!(fixture.store.select_many_calls(), 3);
}

#[test]
fn count_caches_per_filter_when_enabled() {
    let mut fixture = ModelFixture::with_config(listing_config());
    fixture.store.seed("users", common::sample_users());

    let active = Some(filter(json!({"status": "active"})));
    assert_eq!(fixture.engine.count(active.clone()).expect("count"), 2);
    assert_eq!(fixture.engine.count(active).expect("count"), 2);
    assert_eq!(fixture.store.count_calls(), 1);

    assert_eq!(fixture.engine.count(None).expect("count"), 3);
    assert_eq!(fixture.store.count_calls(), 2);
}

#[test]
fn cached_reads_do_not_see_later_writes() {
    let mut fixture = ModelFixture::seeded();
    let before = fixture.engine.get(&json!(1)).expect("get").expect("row");
    fixture
        .engine
        .save(&json!(1), json!({"name": "Alicia"}))
        .expect("save");

    let after = fixture.engine.get(&json!(1)).expect("get").expect("row");
    assert_eq!(before, after, "entries live until the engine is dropped");
}
