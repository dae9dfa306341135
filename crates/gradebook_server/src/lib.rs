//! HTTP transport over `gradebook_core`.
//!
//! # Responsibility
//! - Expose the grade book operations as HTTP routes.
//! - Map every core failure to the uniform client-visible error envelope.

pub mod routes;

pub use routes::{router, serve, SharedService};
