//! Field-level access control.
//!
//! The field access filter is the single chokepoint deciding which fields
//! may be used as filter predicates, written, or returned. Unknown and
//! forbidden fields are silently dropped, never rejected.

pub mod field_filter;

pub use field_filter::{filter_fields, split_condition, AccessKind};
