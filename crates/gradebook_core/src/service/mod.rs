//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store round-trips and query primitives into operation APIs.
//! - Keep transport layers decoupled from storage and aggregation details.

pub mod grade_service;
