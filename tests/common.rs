//! Common test utilities and fixtures.
//!
//! Provides a ready-made engine over an instrumented in-memory store plus
//! the sample schema the integration tests share.

use modelgate::{MemoryStore, ModelConfig, ModelEngine, RecordStore};
use serde_json::{json, Value};
use std::sync::Arc;

/// Engine-plus-store fixture shared across the integration tests.
pub struct ModelFixture {
    pub engine: ModelEngine,
    pub store: Arc<MemoryStore>,
}

impl ModelFixture {
    /// Fixture with default configuration and the sample user schema.
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Fixture with a custom configuration.
    pub fn with_config(config: ModelConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let store = Arc::new(MemoryStore::new());
        let engine = ModelEngine::new(
            config,
            user_schema,
            Arc::clone(&store) as Arc<dyn RecordStore>,
        );
        Self { engine, store }
    }

    /// Fixture preloaded with the three sample users.
    pub fn seeded() -> Self {
        let fixture = Self::new();
        fixture.store.seed("users", sample_users());
        fixture
    }
}

/// The raw schema every fixture engine runs on.
pub fn user_schema() -> Value {
    json!({
        "_model": "users",
        "_table": "users",
        "_id": "id",
        "id": {"type": "pk"},
        "name": {},
        "email": {"length": 255},
        "secret": {"hide": true},
        "created": {"readonly": true},
        "status": {
            "type": "enum",
            "options": {"active": "Active", "archived": "Archived"}
        },
        "internal_rank": {"allow_query": false}
    })
}

/// Three well-known users for read-side tests.
pub fn sample_users() -> Vec<Value> {
    vec![
        json!({
            "id": 1, "name": "Alice", "email": "alice@example.com",
            "secret": "a-token", "created": "2020-01-01",
            "status": "active", "internal_rank": 10
        }),
        json!({
            "id": 2, "name": "Bob", "email": "bob@example.com",
            "secret": "b-token", "created": "2020-02-01",
            "status": "archived", "internal_rank": 20
        }),
        json!({
            "id": 3, "name": "Carol", "email": "carol@example.com",
            "secret": "c-token", "created": "2020-03-01",
            "status": "active", "internal_rank": 30
        }),
    ]
}

/// Build a filter map from a JSON object literal.
pub fn filter(value: Value) -> serde_json::Map<String, Value> {
    value.as_object().cloned().expect("filter must be an object")
}
