//! Artifact and form types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Catalog-specific error type
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Artifact not found: {0}")]
    ArtifactNotFound(String),

    #[error("Form not found: {0}")]
    FormNotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Invalid entry: {0}")]
    Invalid(String),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

fn validate_id(id: &str) -> CatalogResult<()> {
    if id.is_empty() || id.len() > 64 {
        return Err(CatalogError::InvalidId(
            "ID must be 1-64 characters".to_string(),
        ));
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(CatalogError::InvalidId(
            "ID must contain only alphanumeric, dash, or underscore".to_string(),
        ));
    }

    Ok(())
}

fn validate_name(name: &str) -> CatalogResult<()> {
    if name.is_empty() || name.len() > 256 {
        return Err(CatalogError::Invalid(
            "Name must be 1-256 characters".to_string(),
        ));
    }
    Ok(())
}

/// A message artifact (email-like) whose body carries form-field placeholders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique artifact identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Subject line, sent as-is
    #[serde(default)]
    pub subject: String,

    /// Body content with `{formfield=...}` placeholders
    pub body: String,

    /// Only published artifacts can be dispatched
    #[serde(default)]
    pub published: bool,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Artifact {
    pub fn is_published(&self) -> bool {
        self.published
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Validate the artifact
    pub fn validate(&self) -> CatalogResult<()> {
        validate_id(&self.id)?;
        validate_name(&self.name)?;

        if self.body.is_empty() {
            return Err(CatalogError::Invalid("Body must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Request to create a new artifact
#[derive(Debug, Deserialize)]
pub struct CreateArtifactRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub subject: String,
    pub body: String,
    /// Publish immediately (optional, defaults to false)
    #[serde(default)]
    pub published: bool,
}

impl From<CreateArtifactRequest> for Artifact {
    fn from(req: CreateArtifactRequest) -> Self {
        let now = Utc::now();
        Artifact {
            id: req.id,
            name: req.name,
            subject: req.subject,
            body: req.body,
            published: req.published,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Response for listing artifacts
#[derive(Debug, Serialize)]
pub struct ArtifactListResponse {
    pub artifacts: Vec<Artifact>,
    pub total: usize,
}

/// A form whose submissions feed personalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique form identifier
    pub id: String,

    /// Human-readable name
    pub name: String,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Form {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> CatalogResult<()> {
        validate_id(&self.id)?;
        validate_name(&self.name)
    }
}

/// Request to register a form
#[derive(Debug, Deserialize)]
pub struct CreateFormRequest {
    pub id: String,
    pub name: String,
}

impl From<CreateFormRequest> for Form {
    fn from(req: CreateFormRequest) -> Self {
        Form::new(req.id, req.name)
    }
}

/// Response for listing forms
#[derive(Debug, Serialize)]
pub struct FormListResponse {
    pub forms: Vec<Form>,
    pub total: usize,
}
