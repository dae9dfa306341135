//! Grade book document model.
//!
//! # Responsibility
//! - Define the on-disk document shape: id counter plus record sequence.
//! - Provide the mutation helpers that uphold the id-assignment invariants.
//!
//! # Invariants
//! - `next_id` is strictly greater than every `id` present in `grades`.
//! - Record order is insertion order; removal is physical.

use super::grade::{Grade, GradeId};
use serde::{Deserialize, Serialize};

/// Persistent document holding every grade record and the id counter.
///
/// This is the sole persisted state of the system; every operation
/// round-trips the whole document through the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBook {
    /// Next id handed out by [`GradeBook::allocate_id`]. Serialized as
    /// `nextId` to match the external document schema.
    #[serde(rename = "nextId")]
    pub next_id: GradeId,
    /// Records in insertion order.
    pub grades: Vec<Grade>,
}

impl GradeBook {
    /// Creates an empty book with the id counter at 1.
    pub fn new() -> Self {
        Self {
            next_id: 1,
            grades: Vec::new(),
        }
    }

    /// Hands out the next record id and advances the counter.
    ///
    /// Ids are never reused, even after deletes.
    pub fn allocate_id(&mut self) -> GradeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Returns the position of the record with `id`, if present.
    pub fn position(&self, id: GradeId) -> Option<usize> {
        self.grades.iter().position(|grade| grade.id == id)
    }

    /// Removes every record with `id` and returns how many were removed.
    ///
    /// At most one record should match given the id-uniqueness invariant;
    /// removing a missing id is a no-op.
    pub fn remove(&mut self, id: GradeId) -> usize {
        let before = self.grades.len();
        self.grades.retain(|grade| grade.id != id);
        before - self.grades.len()
    }
}

impl Default for GradeBook {
    fn default() -> Self {
        Self::new()
    }
}
