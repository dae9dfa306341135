//! Grade book use-case service.
//!
//! # Responsibility
//! - Orchestrate store round-trips and query primitives into the
//!   create/update/delete/list/get and aggregation operations.
//! - Own id assignment, creation timestamping and input validation.
//!
//! # Invariants
//! - Every operation reloads the document from the store; no cross-request
//!   caching.
//! - Mutations go through [`GradeStore::update`], so id assignment and the
//!   save stay inside one serialized cycle.

use crate::model::book::GradeBook;
use crate::model::grade::{Grade, GradeDraft, GradeId, GradeUpdate, GradeValidationError};
use crate::query::engine::{self, EmptyAggregationError};
use crate::store::{GradeStore, StoreError};
use chrono::Utc;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How many values the top-grades report returns at most.
const TOP_GRADES_COUNT: usize = 3;

pub type ServiceResult<T> = Result<T, GradeServiceError>;

/// Service error for grade book use-cases.
#[derive(Debug)]
pub enum GradeServiceError {
    /// Caller-supplied fields failed validation.
    Validation(GradeValidationError),
    /// Target record does not exist.
    NotFound(GradeId),
    /// Sum or average requested over zero matching records.
    EmptyAggregation(EmptyAggregationError),
    /// Persistence-layer failure.
    Storage(StoreError),
}

impl Display for GradeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "grade record not found: {id}"),
            Self::EmptyAggregation(_) => {
                write!(f, "no grade records match the requested aggregation")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GradeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::EmptyAggregation(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<GradeValidationError> for GradeServiceError {
    fn from(value: GradeValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<EmptyAggregationError> for GradeServiceError {
    fn from(value: EmptyAggregationError) -> Self {
        Self::EmptyAggregation(value)
    }
}

impl From<StoreError> for GradeServiceError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Sum of one student's grades in one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentSubjectSum {
    pub student: String,
    pub subject: String,
    pub total: f64,
}

impl Display for StudentSubjectSum {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "The sum of this student's grades in this subject is {}",
            self.total
        )
    }
}

/// Average of one subject/category group.
///
/// The `Display` rendering is the HTML fragment served by the transport,
/// with the average fixed to two decimal places.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectKindAverage {
    pub subject: String,
    pub kind: String,
    pub average: f64,
}

impl Display for SubjectKindAverage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "<strong>Subject:</strong> {}<br><strong>Type:</strong> {}<br><strong>Average of Grades:</strong> {:.2}",
            self.subject, self.kind, self.average
        )
    }
}

/// Use-case service over a grade store implementation.
pub struct GradeService<S: GradeStore> {
    store: S,
}

impl<S: GradeStore> GradeService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates a record from caller-supplied fields.
    ///
    /// # Contract
    /// - Assigns `id = nextId` and advances the counter.
    /// - Stamps `timestamp` with the current UTC time.
    /// - Returns the record as persisted.
    pub fn create(&self, draft: GradeDraft) -> ServiceResult<Grade> {
        draft.validate()?;

        let grade = self
            .store
            .update(|book: &mut GradeBook| -> ServiceResult<Grade> {
                let grade = Grade::from_draft(book.allocate_id(), draft, Utc::now());
                book.grades.push(grade.clone());
                Ok(grade)
            })?;

        info!(
            "event=grade_create module=service status=ok id={}",
            grade.id
        );
        Ok(grade)
    }

    /// Replaces the mutable fields of an existing record in place.
    ///
    /// `id` and the creation `timestamp` are untouched. The returned record
    /// is cloned from the mutated in-memory document, not re-read from disk.
    pub fn update(&self, update: GradeUpdate) -> ServiceResult<Grade> {
        update.validate()?;

        let grade = self
            .store
            .update(|book: &mut GradeBook| -> ServiceResult<Grade> {
                let index = book
                    .position(update.id)
                    .ok_or(GradeServiceError::NotFound(update.id))?;
                let record = &mut book.grades[index];
                record.student = update.student;
                record.subject = update.subject;
                record.kind = update.kind;
                record.value = update.value;
                Ok(record.clone())
            })?;

        info!(
            "event=grade_update module=service status=ok id={}",
            grade.id
        );
        Ok(grade)
    }

    /// Removes the record with `id`.
    ///
    /// Deleting a missing id is a silent no-op, not an error.
    pub fn delete(&self, id: GradeId) -> ServiceResult<()> {
        let removed = self
            .store
            .update(|book: &mut GradeBook| -> ServiceResult<usize> { Ok(book.remove(id)) })?;

        info!("event=grade_delete module=service status=ok id={id} removed={removed}");
        Ok(())
    }

    /// Lists every record in insertion order.
    ///
    /// The id counter is not part of the result.
    pub fn list(&self) -> ServiceResult<Vec<Grade>> {
        Ok(self.store.load()?.grades)
    }

    /// Looks up one record by id.
    ///
    /// A missing id is reported as `Ok(None)`, not as an error.
    pub fn get(&self, id: GradeId) -> ServiceResult<Option<Grade>> {
        let book = self.store.load()?;
        Ok(engine::find_by_id(&book.grades, id).cloned())
    }

    /// Sums the grades of `student` in `subject`.
    ///
    /// # Errors
    /// - `EmptyAggregation` when no record matches the pair.
    pub fn sum_for_student_subject(
        &self,
        student: &str,
        subject: &str,
    ) -> ServiceResult<StudentSubjectSum> {
        let book = self.store.load()?;
        let matches = engine::filter_by_student_subject(&book.grades, student, subject);
        let total = engine::sum(&engine::values_of(&matches))?;

        Ok(StudentSubjectSum {
            student: student.to_string(),
            subject: subject.to_string(),
            total,
        })
    }

    /// Averages the grades of category `kind` in `subject`.
    ///
    /// # Errors
    /// - `EmptyAggregation` when no record matches the pair.
    pub fn average_for_subject_kind(
        &self,
        subject: &str,
        kind: &str,
    ) -> ServiceResult<SubjectKindAverage> {
        let book = self.store.load()?;
        let matches = engine::filter_by_subject_kind(&book.grades, subject, kind);
        let average = engine::average(&engine::values_of(&matches))?;

        Ok(SubjectKindAverage {
            subject: subject.to_string(),
            kind: kind.to_string(),
            average,
        })
    }

    /// Returns the three largest values of category `kind` in `subject`,
    /// descending.
    ///
    /// Unlike the sum and average reports, an empty selection yields an
    /// empty list.
    pub fn top3_for_subject_kind(&self, subject: &str, kind: &str) -> ServiceResult<Vec<f64>> {
        let book = self.store.load()?;
        let matches = engine::filter_by_subject_kind(&book.grades, subject, kind);
        Ok(engine::top_n(&engine::values_of(&matches), TOP_GRADES_COUNT))
    }
}
