//! Lifecycle hook registry.
//!
//! Hooks are registered under string event names and dispatched in
//! registration order, strictly sequentially. Two dispatch styles exist:
//!
//! * notify - every hook receives the same mutable [`HookArgs`] context and
//!   communicates by mutating it; return values are ignored. Used for
//!   pre-operation argument mangling and post-operation notification.
//! * pipeline - each hook takes the payload and returns the payload handed
//!   to the next hook. Used for value-transforming events such as schema
//!   loading and row shaping.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Well-known engine event names.
pub mod events {
    /// Pre-create; `data` is mutable
    pub const CREATE: &str = "create";
    /// Post-create notification; carries the new id and the persisted data
    pub const CREATED: &str = "created";
    /// Pre-save; `id` and `data` are mutable
    pub const SAVE: &str = "save";
    /// Post-save notification
    pub const SAVED: &str = "saved";
    /// Pre-delete; clearing `id` aborts the delete
    pub const DELETE: &str = "delete";
    /// Post-delete notification
    pub const DELETED: &str = "deleted";
    /// Pre-listing; `filter`, `order_by`, `limit` and `offset` are mutable.
    /// Also fired by `count`.
    pub const GET_ALL: &str = "get_all";
    /// Pre-delete-all; `filter` and `order_by` are mutable
    pub const DELETE_ALL: &str = "delete_all";
    /// Pipeline over the freshly normalized schema, before it is frozen
    pub const SCHEMA_LOADED: &str = "schema_loaded";
    /// Pipeline over the outgoing schema view
    pub const GET_SCHEMA: &str = "get_schema";
    /// Pipeline over every row before hidden fields are stripped
    pub const ROW: &str = "row";
    /// Pipeline over the complete listing result
    pub const ROWS: &str = "rows";
}

/// Mutable context shared by every notify hook fired for one event.
///
/// The engine moves the operation's arguments in, triggers, and reads the
/// possibly mutated values back out. Fields irrelevant to an event are left
/// at their defaults.
#[derive(Debug, Default)]
pub struct HookArgs {
    /// Record identifier; `Value::Null` when absent
    pub id: Value,
    /// Pending record data; `Value::Null` when absent
    pub data: Value,
    /// Filter criteria
    pub filter: Map<String, Value>,
    /// Ordering criteria
    pub order_by: Option<String>,
    /// Listing limit
    pub limit: Option<u64>,
    /// Listing offset
    pub offset: Option<u64>,
}

impl HookArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: Value) -> Self {
        self.id = id;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_filter(mut self, filter: Map<String, Value>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_order_by(mut self, order_by: Option<String>) -> Self {
        self.order_by = order_by;
        self
    }
}

/// How a registration interacts with previously registered hooks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HookMode {
    /// Discard the prior list and install only this hook
    #[default]
    Replace,
    /// Add after the existing hooks
    Append,
    /// Add before the existing hooks
    Prepend,
}

/// A side-effect hook mutating the shared context.
pub type NotifyHook = Box<dyn Fn(&mut HookArgs) + Send + Sync>;
/// A value-transforming hook; its return feeds the next hook in sequence.
pub type PipelineHook = Box<dyn Fn(Value) -> Value + Send + Sync>;

/// Per-engine mapping from event name to ordered hook lists.
#[derive(Default)]
pub struct HookRegistry {
    notify: HashMap<String, Vec<NotifyHook>>,
    pipeline: HashMap<String, Vec<PipelineHook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a notify hook under `event`.
    pub fn on<F>(&mut self, event: &str, hook: F, mode: HookMode)
    where
        F: Fn(&mut HookArgs) + Send + Sync + 'static,
    {
        install(&mut self.notify, event, Box::new(hook) as NotifyHook, mode);
    }

    /// Register a pipeline hook under `event`.
    pub fn on_pipeline<F>(&mut self, event: &str, hook: F, mode: HookMode)
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        install(
            &mut self.pipeline,
            event,
            Box::new(hook) as PipelineHook,
            mode,
        );
    }

    /// Clear all hooks registered for `event`, of both kinds.
    pub fn off(&mut self, event: &str) {
        self.notify.remove(event);
        self.pipeline.remove(event);
    }

    /// Whether any hook is registered for `event`.
    pub fn has(&self, event: &str) -> bool {
        self.notify.get(event).is_some_and(|l| !l.is_empty())
            || self.pipeline.get(event).is_some_and(|l| !l.is_empty())
    }

    /// Side-effect dispatch: run every notify hook over the same mutable
    /// context. No-op when nothing is registered.
    pub fn trigger(&self, event: &str, args: &mut HookArgs) {
        let Some(hooks) = self.notify.get(event) else {
            return;
        };
        for hook in hooks {
            hook(args);
        }
    }

    /// Pipeline dispatch: fold the payload through the registered hooks.
    /// With no hooks the payload passes through unchanged.
    pub fn trigger_pipeline(&self, event: &str, payload: Value) -> Value {
        let Some(hooks) = self.pipeline.get(event) else {
            return payload;
        };
        hooks.iter().fold(payload, |payload, hook| hook(payload))
    }
}

fn install<H>(map: &mut HashMap<String, Vec<H>>, event: &str, hook: H, mode: HookMode) {
    let list = map.entry(event.to_string()).or_default();
    match mode {
        HookMode::Replace => {
            list.clear();
            list.push(hook);
        }
        HookMode::Append => list.push(hook),
        HookMode::Prepend => list.insert(0, hook),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn trigger_without_hooks_is_a_noop() {
        let registry = HookRegistry::new();
        let mut args = HookArgs::new().with_id(json!(1));
        registry.trigger("delete", &mut args);
        assert_eq!(args.id, json!(1));
    }

    #[test]
    fn notify_hooks_mutate_shared_context_in_order() {
        let mut registry = HookRegistry::new();
        registry.on(
            "create",
            |args: &mut HookArgs| {
                args.data = json!({"step": 1});
            },
            HookMode::Replace,
        );
        registry.on(
            "create",
            |args: &mut HookArgs| {
                if let Some(obj) = args.data.as_object_mut() {
                    obj.insert("step".to_string(), json!(2));
                }
            },
            HookMode::Append,
        );

        let mut args = HookArgs::new();
        registry.trigger("create", &mut args);
        assert_eq!(args.data, json!({"step": 2}));
    }

    #[test]
    fn replace_discards_prior_hooks() {
        let count = Arc::new(AtomicU64::new(0));
        let mut registry = HookRegistry::new();
        for _ in 0..3 {
            let count = Arc::clone(&count);
            registry.on(
                "created",
                move |_: &mut HookArgs| {
                    count.fetch_add(1, Ordering::SeqCst);
                },
                HookMode::Replace,
            );
        }
        registry.trigger("created", &mut HookArgs::new());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn prepend_runs_before_existing_hooks() {
        let mut registry = HookRegistry::new();
        registry.on_pipeline(
            "row",
            |payload| json!(format!("{}-second", payload.as_str().unwrap_or(""))),
            HookMode::Replace,
        );
        registry.on_pipeline(
            "row",
            |payload| json!(format!("{}-first", payload.as_str().unwrap_or(""))),
            HookMode::Prepend,
        );
        let out = registry.trigger_pipeline("row", json!("start"));
        assert_eq!(out, json!("start-first-second"));
    }

    #[test]
    fn pipeline_without_hooks_passes_payload_through() {
        let registry = HookRegistry::new();
        let payload = json!({"a": 1});
        assert_eq!(registry.trigger_pipeline("rows", payload.clone()), payload);
    }

    #[test]
    fn off_clears_both_hook_kinds() {
        let mut registry = HookRegistry::new();
        registry.on("save", |_: &mut HookArgs| {}, HookMode::Replace);
        registry.on_pipeline("save", |p| p, HookMode::Append);
        assert!(registry.has("save"));
        registry.off("save");
        assert!(!registry.has("save"));
    }
}
