//! Per-operation result cache.
//!
//! Entries are keyed by `(operation kind, derived key)`. Single-record
//! lookups use their raw identifier as the key; listing and counting use a
//! digest of the full ordered argument tuple so distinct queries never
//! collide and identical queries always hit. Entries have no TTL and no
//! invalidation; they live until the engine instance is dropped.

use crate::config::CacheConfig;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// The cacheable operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Get,
    GetBy,
    GetAll,
    Count,
}

/// Keyed store of previously computed operation results.
pub struct ResultCache {
    enabled: HashMap<OpKind, bool>,
    entries: HashMap<(OpKind, String), Value>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::from_config(&CacheConfig::default())
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cache with enablement taken from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        let mut enabled = HashMap::new();
        enabled.insert(OpKind::Get, config.get);
        enabled.insert(OpKind::GetBy, config.get_by);
        enabled.insert(OpKind::GetAll, config.get_all);
        enabled.insert(OpKind::Count, config.count);
        Self {
            enabled,
            entries: HashMap::new(),
        }
    }

    /// Whether results of `kind` are cached at all.
    pub fn is_enabled(&self, kind: OpKind) -> bool {
        self.enabled.get(&kind).copied().unwrap_or(false)
    }

    /// Toggle caching for one operation kind at runtime.
    pub fn set_enabled(&mut self, kind: OpKind, enabled: bool) {
        self.enabled.insert(kind, enabled);
    }

    /// Look up a previously stored result. Always `None` when `kind` is
    /// disabled.
    pub fn get(&self, kind: OpKind, key: &str) -> Option<Value> {
        if !self.is_enabled(kind) {
            return None;
        }
        self.entries.get(&(kind, key.to_string())).cloned()
    }

    /// Store a result and hand it back unchanged.
    ///
    /// The pass-through return keeps call sites to a single expression even
    /// when caching is disabled for `kind`. A duplicate key is
    /// last-write-wins.
    pub fn set(&mut self, kind: OpKind, key: String, value: Value) -> Value {
        if self.is_enabled(kind) {
            self.entries.insert((kind, key), value.clone());
        }
        value
    }

    /// Number of stored entries across all operation kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cache key for a lookup by identity.
pub fn id_key(id: &Value) -> String {
    render(id)
}

/// Cache key for a lookup by an arbitrary field.
pub fn field_key(field: &str, value: &Value) -> String {
    format!("{}:{}", field, render(value))
}

/// Deterministic digest of an ordered argument tuple.
///
/// `serde_json` maps are ordered, so equal filters serialize identically
/// and always land on the same key.
pub fn digest_key(args: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(args.to_string().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
