//! Sender trait and dispatch options

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::recipient::Credentials;

/// Separator placed between multiple error reasons
pub const REASON_SEPARATOR: &str = "<br />";

/// Provenance tag attributing a send to the batch that caused it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTag {
    /// Kind of source, e.g. `campaign.event`
    pub kind: String,
    /// Identifier of the source within its kind
    pub id: String,
}

impl SourceTag {
    pub fn campaign_event(event_id: impl Into<String>) -> Self {
        Self {
            kind: "campaign.event".to_string(),
            id: event_id.into(),
        }
    }
}

/// Options handed to the sender with every message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOptions {
    /// Batch attribution for auditing
    pub source: SourceTag,

    /// Report errors as results instead of swallowing them
    pub return_errors: bool,

    /// Treat do-not-contact recipients as errors
    pub dnc_as_error: bool,
}

impl SendOptions {
    pub fn new(source: SourceTag) -> Self {
        Self {
            source,
            return_errors: true,
            dnc_as_error: true,
        }
    }

    pub fn return_errors(mut self, return_errors: bool) -> Self {
        self.return_errors = return_errors;
        self
    }

    pub fn dnc_as_error(mut self, dnc_as_error: bool) -> Self {
        self.dnc_as_error = dnc_as_error;
        self
    }
}

/// A personalized message ready to send
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Artifact the message was rendered from
    pub artifact_id: String,
    /// Subject line
    pub subject: String,
    /// Personalized body
    pub content: String,
}

/// Result of a single send, normalized at the sender boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Errors(Vec<String>),
}

impl SendOutcome {
    /// A single scalar error
    pub fn error(reason: impl Into<String>) -> Self {
        SendOutcome::Errors(vec![reason.into()])
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }

    /// Flatten into one reason string; `None` when the send succeeded.
    ///
    /// An empty error list counts as success.
    pub fn into_reason(self) -> Option<String> {
        match self {
            SendOutcome::Sent => None,
            SendOutcome::Errors(errors) if errors.is_empty() => None,
            SendOutcome::Errors(errors) => Some(errors.join(REASON_SEPARATOR)),
        }
    }
}

impl From<Vec<String>> for SendOutcome {
    fn from(errors: Vec<String>) -> Self {
        SendOutcome::Errors(errors)
    }
}

impl From<String> for SendOutcome {
    fn from(error: String) -> Self {
        SendOutcome::error(error)
    }
}

/// Delivers personalized content to one recipient.
///
/// Transport is outside this crate; implementations wrap whatever mailer the
/// deployment uses.
#[async_trait]
pub trait Sender: Send + Sync {
    async fn send(
        &self,
        message: &OutgoingMessage,
        credentials: &Credentials,
        options: &SendOptions,
    ) -> SendOutcome;
}
