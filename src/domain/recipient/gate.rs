//! Per-recipient dispatch preconditions

use serde_json::Value;

use super::types::{Credentials, Recipient};

/// Reason recorded for a recipient without a deliverable address
pub const NO_ADDRESS_REASON: &str = "contact has no deliverable address";

/// Credential key carrying the owning agent
pub const OWNER_FIELD: &str = "owner_id";

/// Default profile field holding the deliverable address
pub const DEFAULT_ADDRESS_FIELD: &str = "email";

/// Outcome of the gate check
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Dispatch may be attempted with these credentials
    Admit(Credentials),
    /// Dispatch is pointless for this recipient
    Reject(String),
}

/// Decides whether dispatch is attempted at all for a recipient.
///
/// Submissions are not inspected here.
#[derive(Debug, Clone)]
pub struct DispatchGate {
    address_field: String,
}

impl Default for DispatchGate {
    fn default() -> Self {
        Self::new(DEFAULT_ADDRESS_FIELD)
    }
}

impl DispatchGate {
    pub fn new(address_field: impl Into<String>) -> Self {
        Self {
            address_field: address_field.into(),
        }
    }

    pub fn address_field(&self) -> &str {
        &self.address_field
    }

    /// Check a recipient and build the credentials it is sent with
    pub fn admit(&self, recipient: &Recipient) -> GateDecision {
        let Some(address) = self.deliverable_address(recipient) else {
            return GateDecision::Reject(NO_ADDRESS_REASON.to_string());
        };

        let mut credentials = recipient.profile.clone();
        credentials.insert(self.address_field.clone(), Value::String(address));

        if let Some(owner_id) = &recipient.owner_id {
            credentials.insert(OWNER_FIELD.to_string(), Value::String(owner_id.clone()));
        }

        GateDecision::Admit(credentials)
    }

    /// The explicit address, else the address profile field; blank counts as absent
    fn deliverable_address(&self, recipient: &Recipient) -> Option<String> {
        recipient
            .address
            .as_deref()
            .or_else(|| {
                recipient
                    .profile
                    .get(&self.address_field)
                    .and_then(Value::as_str)
            })
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(str::to_string)
    }
}
