//! Submission types and error definitions

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Submission-specific error type
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Invalid submission: {0}")]
    InvalidSubmission(String),
}

/// Result type for submission operations
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Lookup result for a single field in an [`Answers`] bag.
///
/// A field that was never answered and a field answered with an empty value
/// are kept apart here, even though substitution renders both as `""`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer<'a> {
    /// The submission has no entry for the field
    Missing,
    /// The field is present but its value is empty or null
    Empty,
    /// The field carries a non-empty value
    Value(&'a str),
}

impl<'a> Answer<'a> {
    /// The text used when this answer replaces a placeholder
    pub fn substitution(&self) -> &'a str {
        match *self {
            Answer::Value(value) => value,
            Answer::Missing | Answer::Empty => "",
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Answer::Missing)
    }
}

/// Field identifier to answer value mapping for one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(HashMap<String, Option<String>>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer for a field
    pub fn insert(&mut self, field_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field_id.into(), Some(value.into()));
    }

    /// Record a field that was submitted without a value
    pub fn insert_empty(&mut self, field_id: impl Into<String>) {
        self.0.insert(field_id.into(), None);
    }

    /// Look up a field
    pub fn get(&self, field_id: &str) -> Answer<'_> {
        match self.0.get(field_id) {
            None => Answer::Missing,
            Some(None) => Answer::Empty,
            Some(Some(value)) if value.is_empty() => Answer::Empty,
            Some(Some(value)) => Answer::Value(value.as_str()),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Answers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

/// One recipient's completion of a form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique submission identifier
    pub id: Uuid,

    /// Form the submission belongs to
    pub form_id: String,

    /// Recipient who submitted the form
    pub recipient_id: String,

    /// When the form was submitted
    pub submitted_at: DateTime<Utc>,

    /// Submitted answers keyed by field identifier
    #[serde(default)]
    pub answers: Answers,
}

impl Submission {
    pub fn new(
        form_id: impl Into<String>,
        recipient_id: impl Into<String>,
        answers: Answers,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id: form_id.into(),
            recipient_id: recipient_id.into(),
            submitted_at: Utc::now(),
            answers,
        }
    }
}

/// Request to record a new submission
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    /// Recipient who submitted the form
    pub recipient_id: String,

    /// Submitted answers
    #[serde(default)]
    pub answers: Answers,

    /// Submission timestamp (optional, defaults to now)
    pub submitted_at: Option<DateTime<Utc>>,
}

impl CreateSubmissionRequest {
    /// Build the submission for the given form
    pub fn into_submission(self, form_id: &str) -> SubmissionResult<Submission> {
        if self.recipient_id.trim().is_empty() {
            return Err(SubmissionError::InvalidSubmission(
                "recipient_id must not be empty".to_string(),
            ));
        }

        let mut submission = Submission::new(form_id, self.recipient_id, self.answers);
        if let Some(submitted_at) = self.submitted_at {
            submission.submitted_at = submitted_at;
        }

        Ok(submission)
    }
}

/// Response for listing submissions of a form
#[derive(Debug, Serialize)]
pub struct SubmissionListResponse {
    pub submissions: Vec<Submission>,
    pub total: usize,
}
