//! Query layer over in-memory grade records.
//!
//! # Responsibility
//! - Host the pure lookup/filter/aggregation primitives.
//! - Keep aggregation failure semantics (empty-input errors) in one place.

pub mod engine;
