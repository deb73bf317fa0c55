//! Batch action endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::domain::batch::{ActionDefinition, BatchReport, BatchRequest, PendingBatch};
use crate::error::{AppError, Result};
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct ActionListResponse {
    pub actions: Vec<ActionDefinition>,
    pub total: usize,
}

/// Batch-level failure as reported to the caller
#[derive(Debug, Serialize)]
pub struct FatalInfo {
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub event_id: String,
    pub handled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BatchReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fatal: Option<FatalInfo>,
    /// Context after the verdicts were applied
    pub context: PendingBatch,
}

/// GET /api/v1/actions
pub async fn list_actions(State(state): State<AppState>) -> Json<ActionListResponse> {
    let actions = state.actions.list();
    let total = actions.len();
    Json(ActionListResponse { actions, total })
}

/// POST /api/v1/batches - Run one batch through its registered action
#[tracing::instrument(
    name = "http.run_batch",
    skip(state, request),
    fields(event_id = %request.event.id, action = %request.event.context)
)]
pub async fn run_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<Json<BatchResponse>> {
    if request.event.id.trim().is_empty() {
        return Err(AppError::Validation("event.id must not be empty".to_string()));
    }

    let mut context = PendingBatch::for_request(&request);
    let mut response = BatchResponse {
        event_id: request.event.id.clone(),
        handled: false,
        report: None,
        fatal: None,
        context: PendingBatch::default(),
    };

    let Some(action) = state.actions.get(&request.event.context) else {
        tracing::debug!("No action registered for event");
        response.context = context;
        return Ok(Json(response));
    };

    match action
        .processor
        .process_batch(&request, state.outbox.as_ref())
        .await
    {
        Ok(report) => {
            report.apply_to(&mut context);
            response.handled = report.handled;
            response.report = Some(report);
        }
        Err(fatal) => {
            fatal.apply_to(&mut context);
            response.handled = true;
            response.fatal = Some(FatalInfo {
                code: fatal.code().to_string(),
                reason: fatal.to_string(),
            });
        }
    }

    response.context = context;
    Ok(Json(response))
}
