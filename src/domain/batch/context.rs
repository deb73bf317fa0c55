//! Batch input types and the orchestrator-side context

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::recipient::Recipient;

/// Mutable view of a pending batch owned by the campaign orchestrator.
///
/// Every recipient is expected to receive at most one verdict.
pub trait BatchContext {
    fn pass(&mut self, recipient_id: &str);
    fn pass_with_error(&mut self, recipient_id: &str, reason: &str);
    fn fail(&mut self, recipient_id: &str, reason: &str);
    fn fail_all(&mut self, reason: &str);
    fn set_channel(&mut self, channel: &str, id: &str);
}

/// The condition node an action is attached beneath
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentCondition {
    /// Condition type, e.g. `form.field_value`
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ParentCondition {
    pub fn property_id(&self, key: &str) -> Option<String> {
        property_id(&self.properties, key)
    }
}

/// A campaign event as delivered to an action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEvent {
    /// Event identifier, used for provenance
    pub id: String,

    /// Action key the event is bound to
    pub context: String,

    /// Action configuration
    #[serde(default)]
    pub properties: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentCondition>,
}

impl BatchEvent {
    pub fn property_id(&self, key: &str) -> Option<String> {
        property_id(&self.properties, key)
    }
}

/// One event plus the recipients pending on it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub event: BatchEvent,
    #[serde(default)]
    pub contacts: Vec<Recipient>,
}

/// Read an identifier property that may be stored as a string or a number
fn property_id(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// In-memory batch context.
///
/// Tracks which recipients are still pending and the verdict recorded for
/// everyone else.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PendingBatch {
    pending: Vec<String>,
    passed: Vec<String>,
    passed_with_note: BTreeMap<String, String>,
    failed: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_all: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<(String, String)>,
}

impl PendingBatch {
    pub fn new<I, S>(recipient_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            pending: recipient_ids.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn for_request(request: &BatchRequest) -> Self {
        Self::new(request.contacts.iter().map(|c| c.id.clone()))
    }

    /// Recipients with no verdict yet
    pub fn pending(&self) -> Vec<String> {
        self.pending.clone()
    }

    pub fn passed(&self) -> &[String] {
        &self.passed
    }

    pub fn passed_with_note(&self) -> &BTreeMap<String, String> {
        &self.passed_with_note
    }

    pub fn failed(&self) -> &BTreeMap<String, String> {
        &self.failed
    }

    pub fn failed_all(&self) -> Option<&str> {
        self.failed_all.as_deref()
    }

    pub fn channel(&self) -> Option<&(String, String)> {
        self.channel.as_ref()
    }

    fn settle(&mut self, recipient_id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|id| id != recipient_id);
        if before == self.pending.len() {
            tracing::warn!(recipient_id = %recipient_id, "Verdict for recipient not pending");
            return false;
        }
        true
    }
}

impl BatchContext for PendingBatch {
    fn pass(&mut self, recipient_id: &str) {
        if self.settle(recipient_id) {
            self.passed.push(recipient_id.to_string());
        }
    }

    fn pass_with_error(&mut self, recipient_id: &str, reason: &str) {
        if self.settle(recipient_id) {
            self.passed_with_note
                .insert(recipient_id.to_string(), reason.to_string());
        }
    }

    fn fail(&mut self, recipient_id: &str, reason: &str) {
        if self.settle(recipient_id) {
            self.failed.insert(recipient_id.to_string(), reason.to_string());
        }
    }

    fn fail_all(&mut self, reason: &str) {
        for recipient_id in std::mem::take(&mut self.pending) {
            self.failed.insert(recipient_id, reason.to_string());
        }
        self.failed_all = Some(reason.to_string());
    }

    fn set_channel(&mut self, channel: &str, id: &str) {
        self.channel = Some((channel.to_string(), id.to_string()));
    }
}
