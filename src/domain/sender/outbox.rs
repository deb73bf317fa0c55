//! Recording sender that keeps every dispatched message in memory.
//!
//! Used as the default sender when no transport is wired in, and by tests to
//! observe exactly what each recipient would have received.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{DashMap, DashSet};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::recipient::{Credentials, DEFAULT_ADDRESS_FIELD};

use super::types::{OutgoingMessage, SendOptions, SendOutcome, Sender, SourceTag};

/// Reason reported for do-not-contact recipients when counted as errors
pub const DO_NOT_CONTACT_REASON: &str = "contact is on the do-not-contact list";

/// Messages retained before the oldest is dropped
pub const DEFAULT_OUTBOX_CAPACITY: usize = 10_000;

/// A message accepted by the outbox
#[derive(Debug, Clone, Serialize)]
pub struct SentMessage {
    pub id: Uuid,
    pub address: String,
    pub artifact_id: String,
    pub subject: String,
    pub content: String,
    pub source: SourceTag,
    pub credentials: Credentials,
    pub sent_at: DateTime<Utc>,
}

/// In-memory sender.
///
/// Honours a do-not-contact list and per-address forced failures, which
/// operators use to rehearse a campaign before wiring a real transport.
/// Keeps at most `capacity` messages; the oldest is dropped when full.
pub struct OutboxSender {
    address_field: String,
    capacity: usize,
    messages: Mutex<VecDeque<SentMessage>>,
    do_not_contact: DashSet<String>,
    forced_failures: DashMap<String, String>,
}

impl Default for OutboxSender {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_FIELD)
    }
}

impl OutboxSender {
    pub fn new(address_field: impl Into<String>) -> Self {
        Self {
            address_field: address_field.into(),
            capacity: DEFAULT_OUTBOX_CAPACITY,
            messages: Mutex::new(VecDeque::new()),
            do_not_contact: DashSet::new(),
            forced_failures: DashMap::new(),
        }
    }

    /// Retain at most `capacity` messages (minimum 1)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Add an address to the do-not-contact list
    pub fn add_do_not_contact(&self, address: &str) {
        self.do_not_contact.insert(normalize(address));
    }

    /// Make every send to `address` fail with `reason`
    pub fn fail_address(&self, address: &str, reason: impl Into<String>) {
        self.forced_failures.insert(normalize(address), reason.into());
    }

    /// Snapshot of accepted messages in send order
    pub fn messages(&self) -> Vec<SentMessage> {
        self.messages
            .lock()
            .map(|messages| messages.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Messages accepted for one address
    pub fn messages_to(&self, address: &str) -> Vec<SentMessage> {
        let address = normalize(address);
        self.messages()
            .into_iter()
            .filter(|m| normalize(&m.address) == address)
            .collect()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().map(|m| m.len()).unwrap_or(0)
    }

    fn check(&self, address: &str, options: &SendOptions) -> Option<SendOutcome> {
        let key = normalize(address);

        if self.do_not_contact.contains(&key) {
            if options.dnc_as_error {
                return Some(SendOutcome::error(DO_NOT_CONTACT_REASON));
            }
            tracing::debug!(address = %address, "Skipping do-not-contact address");
            return Some(SendOutcome::Sent);
        }

        self.forced_failures
            .get(&key)
            .map(|reason| SendOutcome::error(reason.value().clone()))
    }
}

fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

/// With `return_errors` off, failures are logged and reported as sent
fn suppress_if_requested(outcome: SendOutcome, address: &str, options: &SendOptions) -> SendOutcome {
    if outcome.is_sent() || options.return_errors {
        return outcome;
    }

    tracing::warn!(
        address = %address,
        source_id = %options.source.id,
        outcome = ?outcome,
        "Send failed, error suppressed"
    );
    SendOutcome::Sent
}

#[async_trait]
impl Sender for OutboxSender {
    async fn send(
        &self,
        message: &OutgoingMessage,
        credentials: &Credentials,
        options: &SendOptions,
    ) -> SendOutcome {
        let Some(address) = credentials
            .get(&self.address_field)
            .and_then(|v| v.as_str())
            .filter(|a| !a.trim().is_empty())
        else {
            let outcome = SendOutcome::error(format!("missing {} credential", self.address_field));
            return suppress_if_requested(outcome, "", options);
        };

        if let Some(outcome) = self.check(address, options) {
            return suppress_if_requested(outcome, address, options);
        }

        let sent = SentMessage {
            id: Uuid::new_v4(),
            address: address.to_string(),
            artifact_id: message.artifact_id.clone(),
            subject: message.subject.clone(),
            content: message.content.clone(),
            source: options.source.clone(),
            credentials: credentials.clone(),
            sent_at: Utc::now(),
        };

        tracing::debug!(
            message_id = %sent.id,
            address = %sent.address,
            artifact_id = %sent.artifact_id,
            source_kind = %sent.source.kind,
            source_id = %sent.source.id,
            "Message accepted by outbox"
        );

        match self.messages.lock() {
            Ok(mut messages) => {
                while messages.len() >= self.capacity {
                    messages.pop_front();
                }
                messages.push_back(sent);
                SendOutcome::Sent
            }
            Err(_) => suppress_if_requested(SendOutcome::error("outbox unavailable"), address, options),
        }
    }
}
