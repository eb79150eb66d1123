//! Engine configuration.
//!
//! `ModelConfig` carries the host-supplied defaults an engine instance is
//! constructed with: fallback entity/table names used when the schema omits
//! its meta-entries, per-operation cache enablement, and an optional hook
//! seed applied to the registry at construction time.

use crate::error::{ModelError, ModelResult};
use crate::hooks::HookRegistry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Callback applied to a fresh engine's hook registry at construction.
///
/// This is the dependency-injected replacement for process-global default
/// hooks: build it once at startup, hand it to every `ModelConfig`.
pub type HookSeed = Arc<dyn Fn(&mut HookRegistry) + Send + Sync>;

/// Per-operation-kind cache enablement.
///
/// Single-record lookups are cached by default; listing and counting are
/// not, since their key cardinality is unbounded and results go stale
/// faster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub get: bool,
    #[serde(default = "default_true")]
    pub get_by: bool,
    #[serde(default)]
    pub get_all: bool,
    #[serde(default)]
    pub count: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            get: true,
            get_by: true,
            get_all: false,
            count: false,
        }
    }
}

/// Configuration for a [`ModelEngine`](crate::model::ModelEngine) instance.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Entity name used when the schema carries no `_model` meta-entry
    #[serde(default)]
    pub model: Option<String>,
    /// Table name used when the schema carries no `_table` meta-entry
    #[serde(default)]
    pub table: Option<String>,
    /// Per-operation cache enablement
    #[serde(default)]
    pub cache: CacheConfig,
    /// Default hooks applied at engine construction
    #[serde(skip)]
    pub hook_seed: Option<HookSeed>,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("model", &self.model)
            .field("table", &self.table)
            .field("cache", &self.cache)
            .field("hook_seed", &self.hook_seed.is_some())
            .finish()
    }
}

impl ModelConfig {
    /// Create a configuration with the given entity and table defaults.
    pub fn new(model: &str, table: &str) -> Self {
        Self {
            model: Some(model.to_string()),
            table: Some(table.to_string()),
            ..Default::default()
        }
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> ModelResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| ModelError::Config(format!("failed to parse {}: {}", path.display(), e)))
    }

    /// Set the fallback entity name.
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = Some(model.to_string());
        self
    }

    /// Set the fallback table name.
    pub fn with_table(mut self, table: &str) -> Self {
        self.table = Some(table.to_string());
        self
    }

    /// Override the cache enablement flags.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Attach a hook seed applied at engine construction.
    pub fn with_hook_seed(mut self, seed: HookSeed) -> Self {
        self.hook_seed = Some(seed);
        self
    }
}
