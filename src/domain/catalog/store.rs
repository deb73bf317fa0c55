//! Artifact and form storage

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::types::{Artifact, CatalogError, CatalogResult, Form};

/// Read access to message artifacts
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn get_artifact(&self, id: &str) -> Option<Artifact>;
}

/// Read access to forms
#[async_trait]
pub trait FormStore: Send + Sync {
    async fn get_form(&self, id: &str) -> Option<Form>;
}

/// In-memory artifact storage
pub struct MemoryArtifactStore {
    artifacts: DashMap<String, Artifact>,
}

impl Default for MemoryArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self {
            artifacts: DashMap::new(),
        }
    }

    /// Create a new artifact
    pub fn create(&self, artifact: Artifact) -> CatalogResult<Artifact> {
        artifact.validate()?;

        match self.artifacts.entry(artifact.id.clone()) {
            Entry::Occupied(_) => Err(CatalogError::AlreadyExists(artifact.id)),
            Entry::Vacant(slot) => {
                slot.insert(artifact.clone());
                Ok(artifact)
            }
        }
    }

    /// Get an artifact by ID
    pub fn get(&self, id: &str) -> CatalogResult<Artifact> {
        self.artifacts
            .get(id)
            .map(|a| a.clone())
            .ok_or_else(|| CatalogError::ArtifactNotFound(id.to_string()))
    }

    /// List all artifacts
    pub fn list(&self) -> Vec<Artifact> {
        let mut artifacts: Vec<Artifact> = self
            .artifacts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        artifacts.sort_by(|a, b| a.id.cmp(&b.id));
        artifacts
    }

    /// Publish or unpublish an artifact
    pub fn set_published(&self, id: &str, published: bool) -> CatalogResult<Artifact> {
        let mut entry = self
            .artifacts
            .get_mut(id)
            .ok_or_else(|| CatalogError::ArtifactNotFound(id.to_string()))?;

        entry.published = published;
        entry.updated_at = Utc::now();

        tracing::info!(artifact_id = %id, published, "Artifact publish state changed");

        Ok(entry.value().clone())
    }

    /// Delete an artifact by ID
    pub fn delete(&self, id: &str) -> CatalogResult<()> {
        self.artifacts
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| CatalogError::ArtifactNotFound(id.to_string()))
    }

    pub fn count(&self) -> usize {
        self.artifacts.len()
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn get_artifact(&self, id: &str) -> Option<Artifact> {
        self.get(id).ok()
    }
}

/// In-memory form storage
pub struct MemoryFormStore {
    forms: DashMap<String, Form>,
}

impl Default for MemoryFormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFormStore {
    pub fn new() -> Self {
        Self {
            forms: DashMap::new(),
        }
    }

    /// Register a form
    pub fn create(&self, form: Form) -> CatalogResult<Form> {
        form.validate()?;

        match self.forms.entry(form.id.clone()) {
            Entry::Occupied(_) => Err(CatalogError::AlreadyExists(form.id)),
            Entry::Vacant(slot) => {
                slot.insert(form.clone());
                Ok(form)
            }
        }
    }

    pub fn get(&self, id: &str) -> CatalogResult<Form> {
        self.forms
            .get(id)
            .map(|f| f.clone())
            .ok_or_else(|| CatalogError::FormNotFound(id.to_string()))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.forms.contains_key(id)
    }

    pub fn list(&self) -> Vec<Form> {
        let mut forms: Vec<Form> = self
            .forms
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        forms.sort_by(|a, b| a.id.cmp(&b.id));
        forms
    }

    pub fn count(&self) -> usize {
        self.forms.len()
    }
}

#[async_trait]
impl FormStore for MemoryFormStore {
    async fn get_form(&self, id: &str) -> Option<Form> {
        self.get(id).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::CreateArtifactRequest;

    fn artifact(id: &str, published: bool) -> Artifact {
        CreateArtifactRequest {
            id: id.to_string(),
            name: "Test".to_string(),
            subject: String::new(),
            body: "Hello {formfield=fname}".to_string(),
            published,
        }
        .into()
    }

    #[test]
    fn test_store_create_and_get() {
        let store = MemoryArtifactStore::new();

        let created = store.create(artifact("welcome", true)).unwrap();
        assert_eq!(created.id, "welcome");

        let retrieved = store.get("welcome").unwrap();
        assert!(retrieved.is_published());
        assert_eq!(retrieved.body(), "Hello {formfield=fname}");
    }

    #[test]
    fn test_store_create_duplicate() {
        let store = MemoryArtifactStore::new();

        store.create(artifact("dup", false)).unwrap();
        assert!(matches!(
            store.create(artifact("dup", false)),
            Err(CatalogError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_store_publish_toggle() {
        let store = MemoryArtifactStore::new();
        store.create(artifact("toggle", false)).unwrap();

        assert!(store.set_published("toggle", true).unwrap().is_published());
        assert!(!store.set_published("toggle", false).unwrap().is_published());
        assert!(matches!(
            store.set_published("missing", true),
            Err(CatalogError::ArtifactNotFound(_))
        ));
    }

    #[test]
    fn test_store_delete_and_list() {
        let store = MemoryArtifactStore::new();
        for i in 0..3 {
            store.create(artifact(&format!("a-{}", i), false)).unwrap();
        }
        assert_eq!(store.list().len(), 3);

        store.delete("a-1").unwrap();
        assert_eq!(store.count(), 2);
        assert!(store.delete("a-1").is_err());
    }

    #[tokio::test]
    async fn test_artifact_store_trait_lookup() {
        let store = MemoryArtifactStore::new();
        store.create(artifact("lookup", true)).unwrap();

        assert!(store.get_artifact("lookup").await.is_some());
        assert!(store.get_artifact("nope").await.is_none());
    }

    #[tokio::test]
    async fn test_form_store() {
        let store = MemoryFormStore::new();
        store.create(Form::new("survey", "Survey")).unwrap();

        assert!(store.exists("survey"));
        assert!(store.get_form("survey").await.is_some());
        assert!(store.get_form("other").await.is_none());
        assert!(matches!(
            store.create(Form::new("survey", "Again")),
            Err(CatalogError::AlreadyExists(_))
        ));
    }
}
