//! JSON-file grade store.
//!
//! # Responsibility
//! - Persist the grade book as one pretty-printed UTF-8 JSON document.
//! - Serialize concurrent mutation cycles through a single writer lock.
//!
//! # Invariants
//! - The file always holds a complete document (`nextId` + `grades`).
//! - The writer lock spans the whole load-mutate-save sequence, so two
//!   racing `update` calls never lose one of the two mutations.

use super::{GradeStore, StoreError, StoreResult};
use crate::model::book::GradeBook;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

/// Grade store backed by a single JSON file.
pub struct JsonGradeStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonGradeStore {
    /// Creates a store over the document at `path`.
    ///
    /// The file is not touched until the first load or save.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Creates the backing file with an empty document when none exists.
    ///
    /// An existing file is left untouched, whatever it contains.
    pub fn provision(&self) -> StoreResult<()> {
        if self.path.exists() {
            return Ok(());
        }
        self.save(&GradeBook::new())
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GradeStore for JsonGradeStore {
    fn load(&self) -> StoreResult<GradeBook> {
        let started_at = Instant::now();

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                error!(
                    "event=book_load module=store status=error path={} error_code=read_failed error={}",
                    self.path.display(),
                    err
                );
                return Err(err.into());
            }
        };

        match serde_json::from_str::<GradeBook>(&raw) {
            Ok(book) => {
                info!(
                    "event=book_load module=store status=ok grades={} duration_ms={}",
                    book.grades.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(book)
            }
            Err(err) => {
                error!(
                    "event=book_load module=store status=error path={} error_code=malformed_document error={}",
                    self.path.display(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn save(&self, book: &GradeBook) -> StoreResult<()> {
        let started_at = Instant::now();
        let raw = serde_json::to_string_pretty(book)?;

        match std::fs::write(&self.path, raw) {
            Ok(()) => {
                info!(
                    "event=book_save module=store status=ok grades={} duration_ms={}",
                    book.grades.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=book_save module=store status=error path={} error_code=write_failed error={}",
                    self.path.display(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn update<T, E, F>(&self, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut GradeBook) -> Result<T, E>,
        E: From<StoreError>,
    {
        // The lock must cover load as well as save; locking only the save
        // would still let two cycles read the same prior state.
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut book = self.load()?;
        let outcome = apply(&mut book)?;
        self.save(&book)?;
        Ok(outcome)
    }
}
