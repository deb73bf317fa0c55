//! Outbox inspection and rehearsal controls.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::sender::SentMessage;
use crate::error::{AppError, Result};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct OutboxQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OutboxListResponse {
    pub messages: Vec<SentMessage>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct DoNotContactRequest {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct ForcedFailureRequest {
    pub address: String,
    pub reason: String,
}

fn require_address(address: &str) -> Result<()> {
    if address.trim().is_empty() {
        return Err(AppError::Validation("address must not be empty".to_string()));
    }
    Ok(())
}

/// GET /api/v1/outbox[?address=...]
pub async fn list_outbox(
    State(state): State<AppState>,
    Query(query): Query<OutboxQuery>,
) -> Json<OutboxListResponse> {
    let messages = match query.address.as_deref() {
        Some(address) => state.outbox.messages_to(address),
        None => state.outbox.messages(),
    };
    let total = messages.len();
    Json(OutboxListResponse { messages, total })
}

/// POST /api/v1/outbox/do-not-contact
pub async fn add_do_not_contact(
    State(state): State<AppState>,
    Json(request): Json<DoNotContactRequest>,
) -> Result<StatusCode> {
    require_address(&request.address)?;
    state.outbox.add_do_not_contact(&request.address);
    tracing::info!(address = %request.address, "Address added to do-not-contact list");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/outbox/failures
pub async fn force_failure(
    State(state): State<AppState>,
    Json(request): Json<ForcedFailureRequest>,
) -> Result<StatusCode> {
    require_address(&request.address)?;
    if request.reason.trim().is_empty() {
        return Err(AppError::Validation("reason must not be empty".to_string()));
    }
    state.outbox.fail_address(&request.address, request.reason.clone());
    tracing::info!(address = %request.address, reason = %request.reason, "Forced failure registered");
    Ok(StatusCode::NO_CONTENT)
}
