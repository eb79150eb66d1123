//! The model engine.
//!
//! `ModelEngine` orchestrates schema normalization, field access filtering,
//! hook dispatch and result caching around an injected [`RecordStore`] to
//! provide the full CRUD contract for one entity. An instance is
//! request-scoped and single-threaded; every operation takes `&mut self`
//! and completes fully before the next one runs.

mod delete;
mod read;
mod write;

pub use write::SaveOutcome;

use crate::cache::ResultCache;
use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use crate::hooks::{events, HookArgs, HookMode, HookRegistry};
use crate::schema::normalizer;
use crate::schema::types::{Schema, SchemaError};
use crate::store::RecordStore;
use log::info;
use serde_json::Value;
use std::sync::Arc;

/// Supplier of the raw declarative schema for one entity.
///
/// Implemented for free by any closure returning the raw schema value.
pub trait SchemaSource: Send + Sync {
    fn define_schema(&self) -> Value;
}

impl<F> SchemaSource for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn define_schema(&self) -> Value {
        self()
    }
}

/// Schema-driven CRUD engine for a single entity.
pub struct ModelEngine {
    pub(crate) config: ModelConfig,
    source: Box<dyn SchemaSource>,
    raw_override: Option<Value>,
    pub(crate) schema: Option<Arc<Schema>>,
    pub(crate) hooks: HookRegistry,
    pub(crate) cache: ResultCache,
    pub(crate) store: Arc<dyn RecordStore>,
}

impl ModelEngine {
    /// Build an engine from configuration, a schema source and a record
    /// store. The configured hook seed, if any, runs here; the schema is
    /// normalized lazily on first use.
    pub fn new(
        config: ModelConfig,
        source: impl SchemaSource + 'static,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        let mut hooks = HookRegistry::new();
        if let Some(seed) = &config.hook_seed {
            seed(&mut hooks);
        }
        let cache = ResultCache::from_config(&config.cache);
        Self {
            config,
            source: Box::new(source),
            raw_override: None,
            schema: None,
            hooks,
            cache,
            store,
        }
    }

    /// Normalize the schema if it has not been loaded yet.
    ///
    /// Runs at most once per instance lifetime; [`set_schema`] forces a
    /// re-run. The `schema_loaded` pipeline hook may transform the
    /// normalized schema before it is frozen.
    ///
    /// [`set_schema`]: ModelEngine::set_schema
    pub(crate) fn ensure_schema(&mut self) -> ModelResult<()> {
        if self.schema.is_some() {
            return Ok(());
        }

        let raw = match &self.raw_override {
            Some(raw) => raw.clone(),
            None => self.source.define_schema(),
        };
        let schema = normalizer::normalize(
            &raw,
            self.config.model.as_deref(),
            self.config.table.as_deref(),
        )?;

        let schema = if self.hooks.has(events::SCHEMA_LOADED) {
            let transformed = self
                .hooks
                .trigger_pipeline(events::SCHEMA_LOADED, serde_json::to_value(&schema)?);
            let mut schema: Schema = serde_json::from_value(transformed).map_err(|e| {
                SchemaError::InvalidData(format!(
                    "schema_loaded hook produced an invalid schema: {}",
                    e
                ))
            })?;
            // The hook may have changed field flags; the derived list must
            // follow.
            schema.refresh_hidden();
            schema
        } else {
            schema
        };

        info!(
            "model {}: schema loaded ({} fields, id {})",
            schema.model,
            schema.fields.len(),
            schema.id_field
        );
        self.schema = Some(Arc::new(schema));
        Ok(())
    }

    /// The loaded schema, normalizing first when needed.
    pub(crate) fn require_schema(&mut self) -> ModelResult<Arc<Schema>> {
        self.ensure_schema()?;
        self.schema.clone().ok_or_else(|| {
            ModelError::Schema(SchemaError::Missing("schema is not loaded".to_string()))
        })
    }

    /// Force a new raw schema onto the engine and normalize it immediately.
    pub fn set_schema(&mut self, raw: Value) -> ModelResult<()> {
        self.raw_override = Some(raw);
        self.schema = None;
        self.ensure_schema()
    }

    /// The caller-facing schema view: meta-entries plus field descriptors,
    /// with the identity resolved down to its plain field name. The
    /// `get_schema` pipeline hook gets the last word on the outgoing view.
    pub fn get_schema(&mut self) -> ModelResult<Value> {
        let schema = self.require_schema()?;
        let view = normalizer::schema_view(&schema)?;
        Ok(self.hooks.trigger_pipeline(events::GET_SCHEMA, view))
    }

    /// The declared option set of a field, if any. Only meaningful for
    /// enum-like fields.
    pub fn get_options(&mut self, field: &str) -> ModelResult<Option<Value>> {
        let schema = self.require_schema()?;
        Ok(schema.field(field).and_then(|def| def.options.clone()))
    }

    /// Register a notify hook.
    pub fn on<F>(&mut self, event: &str, hook: F, mode: HookMode)
    where
        F: Fn(&mut HookArgs) + Send + Sync + 'static,
    {
        self.hooks.on(event, hook, mode);
    }

    /// Register a pipeline hook.
    pub fn on_pipeline<F>(&mut self, event: &str, hook: F, mode: HookMode)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.hooks.on_pipeline(event, hook, mode);
    }

    /// Clear all hooks for an event.
    pub fn off(&mut self, event: &str) {
        self.hooks.off(event);
    }

    /// Read access to the result cache, mainly for diagnostics.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }
}
