//! Core domain logic for the gradebook service.
//! This crate is the single source of truth for grade-book invariants.

pub mod logging;
pub mod model;
pub mod query;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::GradeBook;
pub use model::grade::{Grade, GradeDraft, GradeId, GradeUpdate, GradeValidationError};
pub use query::engine::EmptyAggregationError;
pub use service::grade_service::{
    GradeService, GradeServiceError, ServiceResult, StudentSubjectSum, SubjectKindAverage,
};
pub use store::{GradeStore, JsonGradeStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
