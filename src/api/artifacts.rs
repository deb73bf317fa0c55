//! Artifact CRUD and publishing endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::domain::catalog::{Artifact, ArtifactListResponse, CreateArtifactRequest};
use crate::error::Result;
use crate::server::AppState;

/// POST /api/v1/artifacts - Create a new artifact
#[tracing::instrument(
    name = "http.create_artifact",
    skip(state, request),
    fields(artifact_id = %request.id)
)]
pub async fn create_artifact(
    State(state): State<AppState>,
    Json(request): Json<CreateArtifactRequest>,
) -> Result<(StatusCode, Json<Artifact>)> {
    let artifact = state.artifacts.create(request.into())?;
    tracing::info!(published = artifact.published, "Artifact created");
    Ok((StatusCode::CREATED, Json(artifact)))
}

/// GET /api/v1/artifacts
pub async fn list_artifacts(State(state): State<AppState>) -> Json<ArtifactListResponse> {
    let artifacts = state.artifacts.list();
    let total = artifacts.len();
    Json(ArtifactListResponse { artifacts, total })
}

/// GET /api/v1/artifacts/{id}
pub async fn get_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Artifact>> {
    Ok(Json(state.artifacts.get(&id)?))
}

/// DELETE /api/v1/artifacts/{id}
#[tracing::instrument(name = "http.delete_artifact", skip(state))]
pub async fn delete_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.artifacts.delete(&id)?;
    tracing::info!("Artifact deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/artifacts/{id}/publish
pub async fn publish_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Artifact>> {
    Ok(Json(state.artifacts.set_published(&id, true)?))
}

/// POST /api/v1/artifacts/{id}/unpublish
pub async fn unpublish_artifact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Artifact>> {
    Ok(Json(state.artifacts.set_published(&id, false)?))
}
