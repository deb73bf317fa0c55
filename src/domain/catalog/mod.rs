//! Message artifacts and forms.
//!
//! This module provides:
//! - Artifact (email-like message template) and form definitions
//! - `ArtifactStore` / `FormStore` lookup traits used by the batch processor
//! - In-memory stores with create/list/publish operations

mod store;
mod types;

pub use store::{ArtifactStore, FormStore, MemoryArtifactStore, MemoryFormStore};
pub use types::{
    Artifact, ArtifactListResponse, CatalogError, CatalogResult, CreateArtifactRequest,
    CreateFormRequest, Form, FormListResponse,
};
