use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::domain::catalog::{Artifact, ArtifactStore, FormStore};
use crate::domain::personalization::personalize;
use crate::domain::recipient::{DispatchGate, GateDecision, Recipient};
use crate::domain::sender::{OutgoingMessage, SendOptions, Sender, SourceTag};
use crate::domain::submission::FormResultResolver;
use crate::metrics::DispatchMetrics;

use super::action::ActionDefinition;
use super::context::{BatchEvent, BatchRequest};
use super::outcome::{BatchFatal, BatchReport, ChannelAttribution, DispatchOutcome};

/// Parent condition property naming the form
const PARENT_FORM_FIELD: &str = "form";

/// Statistics for the batch processor
#[derive(Debug, Default)]
pub struct BatchStats {
    /// Batches run to completion
    pub batches_processed: AtomicU64,
    /// Batches aborted before any recipient was attempted
    pub batches_failed: AtomicU64,
    pub recipients_passed: AtomicU64,
    pub recipients_noted: AtomicU64,
    pub recipients_failed: AtomicU64,
    pub recipients_deferred: AtomicU64,
    /// Individual messages accepted by the sender
    pub messages_sent: AtomicU64,
    /// Individual messages the sender rejected
    pub send_errors: AtomicU64,
}

impl BatchStats {
    pub fn snapshot(&self) -> BatchStatsSnapshot {
        BatchStatsSnapshot {
            batches_processed: self.batches_processed.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            recipients_passed: self.recipients_passed.load(Ordering::Relaxed),
            recipients_noted: self.recipients_noted.load(Ordering::Relaxed),
            recipients_failed: self.recipients_failed.load(Ordering::Relaxed),
            recipients_deferred: self.recipients_deferred.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            send_errors: self.send_errors.load(Ordering::Relaxed),
        }
    }

    fn record_outcome(&self, outcome: &DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::Passed => &self.recipients_passed,
            DispatchOutcome::PassedWithNote(_) => &self.recipients_noted,
            DispatchOutcome::Failed(_) => &self.recipients_failed,
            DispatchOutcome::SkippedNoSubmission => &self.recipients_deferred,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        DispatchMetrics::record_outcome(outcome.label());
    }
}

/// Snapshot of batch processor statistics
#[derive(Debug, Clone, Serialize)]
pub struct BatchStatsSnapshot {
    pub batches_processed: u64,
    pub batches_failed: u64,
    pub recipients_passed: u64,
    pub recipients_noted: u64,
    pub recipients_failed: u64,
    pub recipients_deferred: u64,
    pub messages_sent: u64,
    pub send_errors: u64,
}

/// Runs the "send form results" action over a batch of recipients.
///
/// For every admitted recipient, each of their submissions to the parent
/// form produces one personalized send of the configured artifact.
pub struct BatchProcessor {
    artifacts: Arc<dyn ArtifactStore>,
    forms: Arc<dyn FormStore>,
    resolver: Arc<dyn FormResultResolver>,
    gate: DispatchGate,
    definition: ActionDefinition,
    max_concurrent: usize,
    return_errors: bool,
    dnc_as_error: bool,
    stats: BatchStats,
}

impl BatchProcessor {
    pub fn new(
        artifacts: Arc<dyn ArtifactStore>,
        forms: Arc<dyn FormStore>,
        resolver: Arc<dyn FormResultResolver>,
    ) -> Self {
        Self {
            artifacts,
            forms,
            resolver,
            gate: DispatchGate::default(),
            definition: ActionDefinition::form_results(),
            max_concurrent: 1,
            return_errors: true,
            dnc_as_error: true,
            stats: BatchStats::default(),
        }
    }

    pub fn with_gate(mut self, gate: DispatchGate) -> Self {
        self.gate = gate;
        self
    }

    /// Process up to `max_concurrent` recipients at once; results keep input order
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_send_flags(mut self, return_errors: bool, dnc_as_error: bool) -> Self {
        self.return_errors = return_errors;
        self.dnc_as_error = dnc_as_error;
        self
    }

    pub fn definition(&self) -> &ActionDefinition {
        &self.definition
    }

    pub fn stats(&self) -> BatchStatsSnapshot {
        self.stats.snapshot()
    }

    /// Whether this processor owns the event's action key
    pub fn handles(&self, event: &BatchEvent) -> bool {
        event.context == self.definition.key
    }

    /// Options handed to the sender for every message in the event's batch
    pub fn send_options(&self, event: &BatchEvent) -> SendOptions {
        SendOptions::new(SourceTag::campaign_event(event.id.clone()))
            .return_errors(self.return_errors)
            .dnc_as_error(self.dnc_as_error)
    }

    /// Process one batch.
    ///
    /// Returns an unhandled report for events bound to another action, and
    /// `BatchFatal` when a batch-level precondition fails. In the fatal case no
    /// submission is resolved and nothing is sent.
    #[tracing::instrument(
        name = "batch.process",
        skip(self, batch, sender),
        fields(
            event_id = %batch.event.id,
            action = %batch.event.context,
            recipients = batch.contacts.len()
        )
    )]
    pub async fn process_batch(
        &self,
        batch: &BatchRequest,
        sender: &dyn Sender,
    ) -> Result<BatchReport, BatchFatal> {
        let event = &batch.event;
        if !self.handles(event) {
            tracing::debug!(action = %event.context, "Event bound to another action, ignoring");
            return Ok(BatchReport::unhandled(event.id.clone()));
        }

        let start = Instant::now();
        let result = self.run(batch, sender).await;
        DispatchMetrics::observe_batch_duration(start.elapsed().as_secs_f64());

        match &result {
            Ok(report) => {
                self.stats.batches_processed.fetch_add(1, Ordering::Relaxed);
                DispatchMetrics::record_batch("completed");
                let summary = report.summary();
                tracing::info!(
                    passed = summary.passed,
                    passed_with_note = summary.passed_with_note,
                    failed = summary.failed,
                    deferred = summary.deferred,
                    "Batch processed"
                );
            }
            Err(fatal) => {
                self.stats.batches_failed.fetch_add(1, Ordering::Relaxed);
                DispatchMetrics::record_batch(fatal.code());
                tracing::warn!(reason = %fatal, "Batch aborted");
            }
        }

        result
    }

    async fn run(
        &self,
        batch: &BatchRequest,
        sender: &dyn Sender,
    ) -> Result<BatchReport, BatchFatal> {
        let event = &batch.event;
        let artifact = self.load_artifact(event).await?;

        let parent = event
            .parent
            .as_ref()
            .filter(|parent| parent.kind == self.definition.required_parent)
            .ok_or(BatchFatal::ParentConditionMissing)?;

        let form = match parent.property_id(PARENT_FORM_FIELD) {
            Some(form_id) => self.forms.get_form(&form_id).await,
            None => None,
        }
        .ok_or(BatchFatal::ParentFormMissing)?;

        let options = self.send_options(event);
        let artifact = &artifact;
        let form_id = form.id.as_str();
        let options = &options;

        let mut seen = HashSet::new();
        let pending: Vec<_> = batch
            .contacts
            .iter()
            .filter(|recipient| {
                let first = seen.insert(recipient.id.as_str());
                if !first {
                    tracing::warn!(
                        recipient_id = %recipient.id,
                        "Recipient listed twice in batch, skipping"
                    );
                }
                first
            })
            .map(|recipient| {
                self.process_recipient(recipient, artifact, form_id, sender, options)
            })
            .collect();

        let outcomes: Vec<(String, DispatchOutcome)> = stream::iter(pending)
            .buffered(self.max_concurrent)
            .collect()
            .await;

        let mut report = BatchReport::unhandled(event.id.clone());
        report.handled = true;
        report.channel = Some(ChannelAttribution {
            channel: self.definition.channel.clone(),
            id: artifact.id.clone(),
        });

        for (recipient_id, outcome) in outcomes {
            self.stats.record_outcome(&outcome);
            report.outcomes.insert(recipient_id, outcome);
        }

        Ok(report)
    }

    async fn load_artifact(&self, event: &BatchEvent) -> Result<Artifact, BatchFatal> {
        let Some(artifact_id) = event.property_id(&self.definition.artifact_field) else {
            return Err(BatchFatal::ArtifactUnavailable);
        };

        self.artifacts
            .get_artifact(&artifact_id)
            .await
            .filter(Artifact::is_published)
            .ok_or(BatchFatal::ArtifactUnavailable)
    }

    #[tracing::instrument(
        name = "batch.recipient",
        skip_all,
        fields(recipient_id = %recipient.id)
    )]
    async fn process_recipient(
        &self,
        recipient: &Recipient,
        artifact: &Artifact,
        form_id: &str,
        sender: &dyn Sender,
        options: &SendOptions,
    ) -> (String, DispatchOutcome) {
        let credentials = match self.gate.admit(recipient) {
            GateDecision::Admit(credentials) => credentials,
            GateDecision::Reject(reason) => {
                tracing::info!(
                    contact = %recipient.display_name(),
                    reason = %reason,
                    "Recipient not dispatchable"
                );
                return (recipient.id.clone(), DispatchOutcome::PassedWithNote(reason));
            }
        };

        let submissions = self.resolver.resolve(form_id, &recipient.id).await;
        if submissions.is_empty() {
            tracing::debug!(form_id = %form_id, "No submission yet, deferring");
            return (recipient.id.clone(), DispatchOutcome::SkippedNoSubmission);
        }

        let mut reasons = Vec::new();
        for submission in &submissions {
            let message = OutgoingMessage {
                artifact_id: artifact.id.clone(),
                subject: artifact.subject.clone(),
                content: personalize(artifact.body(), &submission.answers),
            };

            match sender.send(&message, &credentials, options).await.into_reason() {
                None => {
                    self.stats.messages_sent.fetch_add(1, Ordering::Relaxed);
                    DispatchMetrics::record_sent();
                }
                Some(reason) => {
                    self.stats.send_errors.fetch_add(1, Ordering::Relaxed);
                    DispatchMetrics::record_send_error();
                    tracing::warn!(
                        submission_id = %submission.id,
                        reason = %reason,
                        "Send failed"
                    );
                    reasons.push(reason);
                }
            }
        }

        (recipient.id.clone(), DispatchOutcome::from_reasons(reasons))
    }
}
