//! Write-side operations: `create`, `save` and `save_or_create`.

use super::ModelEngine;
use crate::error::{ModelError, ModelResult};
use crate::hooks::{events, HookArgs};
use crate::permissions::{filter_fields, AccessKind};
use log::{debug, info, warn};
use serde_json::{Map, Value};

/// What a [`save_or_create`](ModelEngine::save_or_create) call ended up
/// doing.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// A new record was inserted with this identity
    Created(Value),
    /// An existing record was updated with these fields
    Saved(Map<String, Value>),
    /// Nothing was persisted; the data was empty or fully filtered out
    Nothing,
}

impl ModelEngine {
    /// Insert a new record.
    ///
    /// The `create` notify hook may mutate or replace the pending data
    /// before the field access filter scopes it. Returns the new identity,
    /// or `None` when there was nothing left to persist - callers must
    /// check for this.
    pub fn create(&mut self, data: Value) -> ModelResult<Option<Value>> {
        if !is_populated_record(&data) {
            return Ok(None);
        }
        let schema = self.require_schema()?;

        let mut args = HookArgs::new().with_data(data);
        self.hooks.trigger(events::CREATE, &mut args);
        let Some(candidate) = args.data.as_object() else {
            return Ok(None);
        };

        let save = filter_fields(&schema, candidate, AccessKind::Create);
        if save.is_empty() {
            debug!(
                "model {}: nothing left to create after field filtering",
                schema.model
            );
            return Ok(None);
        }

        let id = self.store.insert(&schema.table, &schema.id_field, &save)?;
        info!("model {}: created record {}", schema.model, id);

        let mut post = HookArgs::new().with_id(id.clone()).with_data(Value::Object(save));
        self.hooks.trigger(events::CREATED, &mut post);
        Ok(Some(id))
    }

    /// Update the record addressed by `id`.
    ///
    /// The `save` notify hook may mutate the identity and the pending data.
    /// Returns the field map actually written, or `None` when the call was
    /// a no-op (missing id, empty data, or everything filtered out).
    pub fn save(&mut self, id: &Value, data: Value) -> ModelResult<Option<Map<String, Value>>> {
        if id.is_null() || !is_populated_record(&data) {
            return Ok(None);
        }
        let schema = self.require_schema()?;

        let mut args = HookArgs::new().with_id(id.clone()).with_data(data);
        self.hooks.trigger(events::SAVE, &mut args);
        if args.id.is_null() {
            return Ok(None);
        }
        let Some(candidate) = args.data.as_object() else {
            return Ok(None);
        };

        let save = filter_fields(&schema, candidate, AccessKind::Save);
        if save.is_empty() {
            debug!(
                "model {}: nothing left to save after field filtering",
                schema.model
            );
            return Ok(None);
        }

        let updated = self
            .store
            .update_by_id(&schema.table, &schema.id_field, &args.id, &save)?;
        if !updated {
            warn!(
                "model {}: save addressed missing record {}",
                schema.model, args.id
            );
        }

        let mut post = HookArgs::new()
            .with_id(args.id)
            .with_data(Value::Object(save.clone()));
        self.hooks.trigger(events::SAVED, &mut post);
        Ok(Some(save))
    }

    /// Save when the record carries its identity, create otherwise.
    ///
    /// The identity field is stripped from the data before saving; primary
    /// keys are never writable anyway. Fails when `data` is present but not
    /// a structured record.
    pub fn save_or_create(&mut self, data: Value) -> ModelResult<SaveOutcome> {
        if data.is_null() {
            return Ok(SaveOutcome::Nothing);
        }
        let Value::Object(mut record) = data else {
            return Err(ModelError::Config(
                "save_or_create requires a structured record".to_string(),
            ));
        };
        if record.is_empty() {
            return Ok(SaveOutcome::Nothing);
        }
        let schema = self.require_schema()?;

        match record.remove(&schema.id_field) {
            Some(id) if !id.is_null() => Ok(match self.save(&id, Value::Object(record))? {
                Some(saved) => SaveOutcome::Saved(saved),
                None => SaveOutcome::Nothing,
            }),
            _ => Ok(match self.create(Value::Object(record))? {
                Some(id) => SaveOutcome::Created(id),
                None => SaveOutcome::Nothing,
            }),
        }
    }
}

fn is_populated_record(data: &Value) -> bool {
    data.as_object().is_some_and(|obj| !obj.is_empty())
}
