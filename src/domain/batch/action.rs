//! Campaign action registration

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;

use super::processor::BatchProcessor;

/// Action key for "send form results"
pub const FORM_RESULTS_ACTION: &str = "email.send.form.results";

/// Condition type an action must sit beneath
pub const FORM_FIELD_VALUE_CONDITION: &str = "form.field_value";

/// How an action presents itself to the campaign builder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDefinition {
    pub key: String,
    pub label: String,
    pub description: String,

    /// Channel the action dispatches through
    pub channel: String,

    /// Event property carrying the channel entity ID
    pub channel_id_field: String,

    /// Event property naming the artifact to send
    pub artifact_field: String,

    /// Parent condition type required for the action to run
    pub required_parent: String,

    /// Event types the action may not be anchored under
    pub anchor_restrictions: Vec<String>,
}

impl ActionDefinition {
    /// Send a personalized email per form submission
    pub fn form_results() -> Self {
        Self {
            key: FORM_RESULTS_ACTION.to_string(),
            label: "Send form results".to_string(),
            description: "Send an email built from the contact's form submissions".to_string(),
            channel: "email".to_string(),
            channel_id_field: "email".to_string(),
            artifact_field: "email".to_string(),
            required_parent: FORM_FIELD_VALUE_CONDITION.to_string(),
            anchor_restrictions: vec!["condition.inaction".to_string()],
        }
    }
}

/// An action definition bound to the processor that runs it
#[derive(Clone)]
pub struct RegisteredAction {
    pub definition: ActionDefinition,
    pub processor: Arc<BatchProcessor>,
}

/// Registry of batch actions keyed by action key
#[derive(Default)]
pub struct ActionRegistry {
    actions: DashMap<String, RegisteredAction>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor under its definition's key, replacing any previous one
    pub fn register(&self, processor: Arc<BatchProcessor>) {
        let definition = processor.definition().clone();
        tracing::info!(action = %definition.key, channel = %definition.channel, "Registered batch action");
        self.actions.insert(
            definition.key.clone(),
            RegisteredAction {
                definition,
                processor,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<RegisteredAction> {
        self.actions.get(key).map(|entry| entry.value().clone())
    }

    /// All definitions sorted by key
    pub fn list(&self) -> Vec<ActionDefinition> {
        let mut definitions: Vec<_> = self
            .actions
            .iter()
            .map(|entry| entry.value().definition.clone())
            .collect();
        definitions.sort_by(|a, b| a.key.cmp(&b.key));
        definitions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
