//! Grade record model and field validation.
//!
//! # Responsibility
//! - Define the canonical grade record stored in the grade book.
//! - Validate caller-supplied fields before they reach persistence.
//!
//! # Invariants
//! - `id` is unique within one grade book and never reused.
//! - `timestamp` is assigned at creation and never updated afterwards.
//! - `value` is finite; the JSON document cannot hold NaN or infinity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier for a grade record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type GradeId = u64;

/// Canonical grade record as persisted in the grade book document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    /// Monotonically assigned record id, unique within one grade book.
    pub id: GradeId,
    /// Student the grade belongs to.
    pub student: String,
    /// Subject the grade was awarded in.
    pub subject: String,
    /// Grade category (exam, quiz, homework, ...). Serialized as `type`
    /// to match the external document schema.
    #[serde(rename = "type")]
    pub kind: String,
    /// Grade value. Finite; no range clamping is applied.
    pub value: f64,
    /// Creation time. Immutable once the record is first persisted.
    pub timestamp: DateTime<Utc>,
}

impl Grade {
    /// Builds a record from caller-supplied fields plus service-assigned
    /// identity and creation time.
    pub fn from_draft(id: GradeId, draft: GradeDraft, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            student: draft.student,
            subject: draft.subject,
            kind: draft.kind,
            value: draft.value,
            timestamp,
        }
    }
}

/// Caller-supplied fields for creating a record.
///
/// `id` and `timestamp` are assigned by the service at creation time and are
/// deliberately absent here.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradeDraft {
    pub student: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
}

impl GradeDraft {
    /// Checks that every required field is present and storable.
    ///
    /// # Errors
    /// - [`GradeValidationError::MissingField`] when a text field is empty.
    /// - [`GradeValidationError::NonFiniteValue`] when `value` is NaN or
    ///   infinite.
    pub fn validate(&self) -> Result<(), GradeValidationError> {
        validate_record_fields(&self.student, &self.subject, &self.kind, self.value)
    }
}

/// Caller-supplied fields for replacing an existing record.
///
/// Everything except `id` and the creation `timestamp` is replaceable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradeUpdate {
    pub id: GradeId,
    pub student: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
}

impl GradeUpdate {
    /// Same field checks as [`GradeDraft::validate`].
    pub fn validate(&self) -> Result<(), GradeValidationError> {
        validate_record_fields(&self.student, &self.subject, &self.kind, self.value)
    }
}

/// Validation error for caller-supplied grade fields.
#[derive(Debug, PartialEq)]
pub enum GradeValidationError {
    /// A required text field is missing or empty.
    MissingField(&'static str),
    /// `value` cannot be represented in the JSON document.
    NonFiniteValue(f64),
}

impl Display for GradeValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is missing or empty"),
            Self::NonFiniteValue(value) => {
                write!(f, "grade value must be a finite number, got {value}")
            }
        }
    }
}

impl Error for GradeValidationError {}

fn validate_record_fields(
    student: &str,
    subject: &str,
    kind: &str,
    value: f64,
) -> Result<(), GradeValidationError> {
    if student.is_empty() {
        return Err(GradeValidationError::MissingField("student"));
    }
    if subject.is_empty() {
        return Err(GradeValidationError::MissingField("subject"));
    }
    if kind.is_empty() {
        return Err(GradeValidationError::MissingField("type"));
    }
    if !value.is_finite() {
        return Err(GradeValidationError::NonFiniteValue(value));
    }
    Ok(())
}
