//! Grade book persistence layer.
//!
//! # Responsibility
//! - Define the load/save contract for the grade book document.
//! - Isolate file-format and I/O details from service orchestration.
//!
//! # Invariants
//! - Every save writes the complete document; partial writes do not exist.
//! - Mutation cycles go through [`GradeStore::update`], which saves only
//!   when the mutation succeeds.

use crate::model::book::GradeBook;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod json_store;

pub use json_store::JsonGradeStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for grade book load/save operations.
#[derive(Debug)]
pub enum StoreError {
    /// Backing file could not be read or written.
    Io(std::io::Error),
    /// Backing file holds data that is not a valid grade book document.
    Malformed(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "grade book file I/O failed: {err}"),
            Self::Malformed(err) => write!(f, "grade book file is not a valid document: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Malformed(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

/// Storage contract for the grade book document.
///
/// Implementations own the backing medium; callers always round-trip the
/// entire document, even for single-record changes.
pub trait GradeStore {
    /// Reads and parses the full document.
    fn load(&self) -> StoreResult<GradeBook>;

    /// Serializes `book` and replaces the previous document in full.
    fn save(&self, book: &GradeBook) -> StoreResult<()>;

    /// Runs one load-mutate-save cycle.
    ///
    /// The document is saved only when `apply` returns `Ok`. Implementations
    /// backed by shared storage must serialize concurrent `update` calls so
    /// that racing cycles cannot overwrite each other's saves.
    fn update<T, E, F>(&self, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut GradeBook) -> Result<T, E>,
        E: From<StoreError>;
}
