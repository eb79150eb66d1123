//! # Modelgate
//!
//! Modelgate turns a declarative field schema into a full set of CRUD
//! operations layered with field-level access control, lifecycle hooks and a
//! per-operation result cache.
//!
//! ## Core Components
//!
//! * `schema` - Raw schema parsing and normalization into a canonical form
//! * `permissions` - Field access filter enforcing per-operation field
//!   visibility
//! * `hooks` - Event-keyed hook registry with notify and pipeline dispatch
//! * `cache` - Per-operation-kind result cache with deterministic keying
//! * `model` - The model engine orchestrating CRUD against an injected store
//! * `store` - The record store seam plus a sled-backed implementation
//! * `config` - Engine configuration (entity defaults, cache flags, hook seed)
//! * `error` - Error types and handling
//!
//! ## Architecture
//!
//! A caller invokes a [`ModelEngine`] operation. The engine normalizes the
//! schema on first use, consults the result cache, dispatches pre-operation
//! hooks, scopes input and output fields through the field access filter,
//! delegates to the injected [`RecordStore`], dispatches post-operation hooks
//! and finally writes the cache. The engine owns no HTTP and no SQL; both the
//! record store and the schema source are injected by the host.

pub mod cache;
pub mod config;
pub mod error;
pub mod hooks;
pub mod model;
pub mod permissions;
pub mod schema;
pub mod store;
pub mod testing;

// Re-export main types for convenience
pub use cache::{OpKind, ResultCache};
pub use config::{CacheConfig, HookSeed, ModelConfig};
pub use error::{ModelError, ModelResult};
pub use hooks::{events, HookArgs, HookMode, HookRegistry};
pub use model::{ModelEngine, SaveOutcome, SchemaSource};
pub use permissions::field_filter::{filter_fields, AccessKind};
pub use schema::types::{FieldDef, Schema, SchemaError};
pub use store::{RecordStore, SledStore};
pub use testing::MemoryStore;
