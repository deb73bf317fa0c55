use serde::{Deserialize, Serialize};

/// Profile fields handed to the sender alongside personalized content
pub type Credentials = serde_json::Map<String, serde_json::Value>;

/// A contact pending a batch action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    /// Unique recipient identifier
    pub id: String,

    /// Deliverable address (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Owning agent, used by "owner is sender" routing (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,

    /// Display identifier for operator-facing messages
    #[serde(default)]
    pub primary_identifier: String,

    /// Additional profile fields
    #[serde(default)]
    pub profile: Credentials,
}

impl Recipient {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: None,
            owner_id: None,
            primary_identifier: String::new(),
            profile: Credentials::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_owner(mut self, owner_id: impl Into<String>) -> Self {
        self.owner_id = Some(owner_id.into());
        self
    }

    pub fn with_profile_field(
        mut self,
        field: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.profile.insert(field.into(), value.into());
        self
    }

    /// Name shown to operators; falls back to the ID
    pub fn display_name(&self) -> &str {
        if self.primary_identifier.is_empty() {
            &self.id
        } else {
            &self.primary_identifier
        }
    }
}
