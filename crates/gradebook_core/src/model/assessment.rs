//! Assessment domain model.
//!
//! # Responsibility
//! - Define the canonical graded/gradeable record and its write-side inputs.
//! - Enforce record-level range constraints before anything is persisted.
//!
//! # Invariants
//! - `id` is assigned by storage and never changes afterwards.
//! - `weight_pct` lies in `[0, 100]`; `score_pct` lies in `[0, 100]` when set.
//! - `title` is non-empty after trimming.
//! - Weight totals across records are NOT constrained here; see
//!   `calc::validate_weights` for the advisory check.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned identifier for an assessment.
pub type AssessmentId = i64;

/// Lower bound for weight and score percentages.
pub const PCT_MIN: f64 = 0.0;
/// Upper bound for weight and score percentages.
pub const PCT_MAX: f64 = 100.0;

/// Validation failures for assessment writes.
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Weight is outside `[0, 100]` or not finite.
    WeightOutOfRange(f64),
    /// Score is outside `[0, 100]` or not finite.
    ScoreOutOfRange(f64),
}

impl Display for AssessmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::WeightOutOfRange(value) => {
                write!(f, "weight_pct ({value}) must be between 0 and 100")
            }
            Self::ScoreOutOfRange(value) => {
                write!(f, "score_pct ({value}) must be between 0 and 100")
            }
        }
    }
}

impl Error for AssessmentValidationError {}

/// One graded (or not yet graded) piece of coursework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub title: String,
    /// Contribution to the final grade, in percent.
    pub weight_pct: f64,
    /// Display ordering key only.
    pub due_date: NaiveDate,
    /// `None` means "not yet graded".
    pub score_pct: Option<f64>,
}

impl Assessment {
    /// Returns whether a score has been recorded.
    pub fn is_graded(&self) -> bool {
        self.score_pct.is_some()
    }

    /// Validates record-level invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `WeightOutOfRange` / `ScoreOutOfRange` for values outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), AssessmentValidationError> {
        validate_fields(&self.title, self.weight_pct, self.score_pct)
    }

    /// Applies a partial patch and returns the validated result.
    ///
    /// The receiver is left untouched when validation fails.
    pub fn patched(&self, patch: &AssessmentPatch) -> Result<Self, AssessmentValidationError> {
        let mut next = self.clone();
        if let Some(title) = &patch.title {
            next.title = title.trim().to_string();
        }
        if let Some(weight_pct) = patch.weight_pct {
            next.weight_pct = weight_pct;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        if let Some(score_pct) = patch.score_pct {
            next.score_pct = score_pct;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Create input for a new assessment. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssessment {
    pub title: String,
    pub weight_pct: f64,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub score_pct: Option<f64>,
}

impl NewAssessment {
    /// Builds an ungraded create request.
    pub fn new(title: impl Into<String>, weight_pct: f64, due_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            weight_pct,
            due_date,
            score_pct: None,
        }
    }

    /// Sets the score on a create request.
    pub fn with_score(mut self, score_pct: f64) -> Self {
        self.score_pct = Some(score_pct);
        self
    }

    /// Returns a copy with the title trimmed, validated for persistence.
    pub fn normalized(&self) -> Result<Self, AssessmentValidationError> {
        let normalized = Self {
            title: self.title.trim().to_string(),
            ..self.clone()
        };
        validate_fields(&normalized.title, normalized.weight_pct, normalized.score_pct)?;
        Ok(normalized)
    }
}

/// Partial update input. Omitted fields stay unchanged.
///
/// `score_pct` is doubly optional: `Some(None)` clears the score (explicit
/// JSON `null`), `None` leaves it as is (field absent).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub weight_pct: Option<f64>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub score_pct: Option<Option<f64>>,
}

impl AssessmentPatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.weight_pct.is_none()
            && self.due_date.is_none()
            && self.score_pct.is_none()
    }
}

// Only invoked when the key is present, so `null` becomes `Some(None)`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

fn validate_fields(
    title: &str,
    weight_pct: f64,
    score_pct: Option<f64>,
) -> Result<(), AssessmentValidationError> {
    if title.trim().is_empty() {
        return Err(AssessmentValidationError::EmptyTitle);
    }
    if !is_pct(weight_pct) {
        return Err(AssessmentValidationError::WeightOutOfRange(weight_pct));
    }
    if let Some(score) = score_pct {
        if !is_pct(score) {
            return Err(AssessmentValidationError::ScoreOutOfRange(score));
        }
    }
    Ok(())
}

fn is_pct(value: f64) -> bool {
    value.is_finite() && (PCT_MIN..=PCT_MAX).contains(&value)
}
