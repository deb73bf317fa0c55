//! In-memory submission store using DashMap.
//!
//! Submissions are kept per (form, recipient) pair and will be lost on
//! service restart.

use async_trait::async_trait;
use dashmap::DashMap;

use super::resolver::FormResultResolver;
use super::types::Submission;

/// In-memory submission storage.
///
/// Each (form, recipient) pair holds its submissions oldest first. Submissions
/// sharing a timestamp keep their insertion order.
pub struct MemorySubmissionStore {
    submissions: DashMap<(String, String), Vec<Submission>>,
}

impl Default for MemorySubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        Self {
            submissions: DashMap::new(),
        }
    }

    /// Record a submission
    pub fn record(&self, submission: Submission) -> Submission {
        let key = (submission.form_id.clone(), submission.recipient_id.clone());
        let mut entries = self.submissions.entry(key).or_default();

        // Stable sort keeps insertion order for equal timestamps
        entries.push(submission.clone());
        entries.sort_by_key(|s| s.submitted_at);

        tracing::debug!(
            form_id = %submission.form_id,
            recipient_id = %submission.recipient_id,
            submission_id = %submission.id,
            count = entries.len(),
            "Recorded form submission"
        );

        submission
    }

    /// All submissions for a form, grouped by recipient
    pub fn list_for_form(&self, form_id: &str) -> Vec<Submission> {
        let mut all: Vec<Submission> = self
            .submissions
            .iter()
            .filter(|entry| entry.key().0 == form_id)
            .flat_map(|entry| entry.value().clone())
            .collect();

        all.sort_by(|a, b| {
            a.recipient_id
                .cmp(&b.recipient_id)
                .then(a.submitted_at.cmp(&b.submitted_at))
        });
        all
    }

    /// Total number of stored submissions
    pub fn count(&self) -> usize {
        self.submissions.iter().map(|entry| entry.value().len()).sum()
    }
}

#[async_trait]
impl FormResultResolver for MemorySubmissionStore {
    async fn resolve(&self, form_id: &str, recipient_id: &str) -> Vec<Submission> {
        self.submissions
            .get(&(form_id.to_string(), recipient_id.to_string()))
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }
}
