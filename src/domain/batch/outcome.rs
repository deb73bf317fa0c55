//! Batch outcomes and batch-level failures

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::domain::sender::REASON_SEPARATOR;

use super::context::BatchContext;

/// Conditions that abort a whole batch before any recipient is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchFatal {
    #[error("artifact not found or not published")]
    ArtifactUnavailable,

    #[error("parent condition not found")]
    ParentConditionMissing,

    #[error("parent form not found")]
    ParentFormMissing,
}

impl BatchFatal {
    /// Fail every pending recipient with this reason
    pub fn apply_to(&self, context: &mut dyn BatchContext) {
        context.fail_all(&self.to_string());
    }

    /// Stable label used for metrics and API responses
    pub fn code(&self) -> &'static str {
        match self {
            BatchFatal::ArtifactUnavailable => "ARTIFACT_UNAVAILABLE",
            BatchFatal::ParentConditionMissing => "PARENT_CONDITION_MISSING",
            BatchFatal::ParentFormMissing => "PARENT_FORM_MISSING",
        }
    }
}

/// Per-recipient verdict for one batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// Every submission was sent
    Passed,
    /// Nothing was sent and retrying will not help
    PassedWithNote(String),
    /// At least one submission failed; reasons joined in order
    Failed(String),
    /// No qualifying submission yet; the recipient stays pending
    SkippedNoSubmission,
}

impl DispatchOutcome {
    /// Aggregate per-submission failure reasons
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        if reasons.is_empty() {
            DispatchOutcome::Passed
        } else {
            DispatchOutcome::Failed(reasons.join(REASON_SEPARATOR))
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            DispatchOutcome::PassedWithNote(reason) | DispatchOutcome::Failed(reason) => {
                Some(reason)
            }
            DispatchOutcome::Passed | DispatchOutcome::SkippedNoSubmission => None,
        }
    }

    /// Label used for metrics
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Passed => "passed",
            DispatchOutcome::PassedWithNote(_) => "passed_with_note",
            DispatchOutcome::Failed(_) => "failed",
            DispatchOutcome::SkippedNoSubmission => "skipped_no_submission",
        }
    }
}

/// Channel a batch dispatched through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelAttribution {
    pub channel: String,
    pub id: String,
}

/// Counts of each outcome kind in a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeSummary {
    pub passed: usize,
    pub passed_with_note: usize,
    pub failed: usize,
    pub deferred: usize,
}

/// Result of a completed batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Triggering event
    pub event_id: String,

    /// Whether this action handled the batch at all
    pub handled: bool,

    /// Channel attribution, set once the artifact resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<ChannelAttribution>,

    /// Verdict per recipient ID
    pub outcomes: BTreeMap<String, DispatchOutcome>,
}

impl BatchReport {
    /// Report for a batch addressed to another action
    pub fn unhandled(event_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            handled: false,
            channel: None,
            outcomes: BTreeMap::new(),
        }
    }

    pub fn get(&self, recipient_id: &str) -> Option<&DispatchOutcome> {
        self.outcomes.get(recipient_id)
    }

    pub fn summary(&self) -> OutcomeSummary {
        let mut summary = OutcomeSummary::default();
        for outcome in self.outcomes.values() {
            match outcome {
                DispatchOutcome::Passed => summary.passed += 1,
                DispatchOutcome::PassedWithNote(_) => summary.passed_with_note += 1,
                DispatchOutcome::Failed(_) => summary.failed += 1,
                DispatchOutcome::SkippedNoSubmission => summary.deferred += 1,
            }
        }
        summary
    }

    /// Write every terminal outcome into the orchestrator's context.
    ///
    /// Deferred recipients are left untouched so they remain pending.
    pub fn apply_to(&self, context: &mut dyn BatchContext) {
        if let Some(channel) = &self.channel {
            context.set_channel(&channel.channel, &channel.id);
        }

        for (recipient_id, outcome) in &self.outcomes {
            match outcome {
                DispatchOutcome::Passed => context.pass(recipient_id),
                DispatchOutcome::PassedWithNote(reason) => {
                    context.pass_with_error(recipient_id, reason)
                }
                DispatchOutcome::Failed(reason) => context.fail(recipient_id, reason),
                DispatchOutcome::SkippedNoSubmission => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::PendingBatch;

    #[test]
    fn test_from_reasons() {
        assert_eq!(DispatchOutcome::from_reasons(vec![]), DispatchOutcome::Passed);
        assert_eq!(
            DispatchOutcome::from_reasons(vec!["a".to_string(), "b".to_string()]),
            DispatchOutcome::Failed("a<br />b".to_string())
        );
    }

    #[test]
    fn test_fatal_messages() {
        assert_eq!(
            BatchFatal::ArtifactUnavailable.to_string(),
            "artifact not found or not published"
        );
        assert_eq!(BatchFatal::ParentFormMissing.to_string(), "parent form not found");
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(DispatchOutcome::Failed("x".to_string())).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "x");

        let json = serde_json::to_value(DispatchOutcome::Passed).unwrap();
        assert_eq!(json["status"], "passed");
    }

    #[test]
    fn test_apply_leaves_deferred_pending() {
        let mut report = BatchReport::unhandled("evt-1");
        report.handled = true;
        report.channel = Some(ChannelAttribution {
            channel: "email".to_string(),
            id: "welcome".to_string(),
        });
        report.outcomes.insert("a".to_string(), DispatchOutcome::Passed);
        report.outcomes.insert(
            "b".to_string(),
            DispatchOutcome::PassedWithNote("no address".to_string()),
        );
        report
            .outcomes
            .insert("c".to_string(), DispatchOutcome::Failed("bounced".to_string()));
        report
            .outcomes
            .insert("d".to_string(), DispatchOutcome::SkippedNoSubmission);

        let mut context = PendingBatch::new(["a", "b", "c", "d"]);
        report.apply_to(&mut context);

        assert_eq!(context.passed(), &["a".to_string()]);
        assert_eq!(context.passed_with_note().len(), 1);
        assert_eq!(context.failed().len(), 1);
        assert_eq!(context.pending(), vec!["d".to_string()]);
        assert_eq!(
            context.channel(),
            Some(&("email".to_string(), "welcome".to_string()))
        );

        let summary = report.summary();
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.deferred, 1);
    }
}
