//! Form and submission endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::domain::catalog::{CreateFormRequest, Form, FormListResponse};
use crate::domain::submission::{
    CreateSubmissionRequest, Submission, SubmissionError, SubmissionListResponse,
};
use crate::error::Result;
use crate::server::AppState;

/// POST /api/v1/forms - Register a form
#[tracing::instrument(
    name = "http.create_form",
    skip(state, request),
    fields(form_id = %request.id)
)]
pub async fn create_form(
    State(state): State<AppState>,
    Json(request): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<Form>)> {
    let form = state.forms.create(request.into())?;
    tracing::info!("Form created");
    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /api/v1/forms
pub async fn list_forms(State(state): State<AppState>) -> Json<FormListResponse> {
    let forms = state.forms.list();
    let total = forms.len();
    Json(FormListResponse { forms, total })
}

/// GET /api/v1/forms/{id}
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Form>> {
    Ok(Json(state.forms.get(&id)?))
}

/// POST /api/v1/forms/{id}/submissions - Record a recipient's submission
#[tracing::instrument(
    name = "http.create_submission",
    skip(state, request),
    fields(recipient_id = %request.recipient_id)
)]
pub async fn create_submission(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(request): Json<CreateSubmissionRequest>,
) -> Result<(StatusCode, Json<Submission>)> {
    if !state.forms.exists(&form_id) {
        return Err(SubmissionError::FormNotFound(form_id).into());
    }

    let submission = state.submissions.record(request.into_submission(&form_id)?);
    Ok((StatusCode::CREATED, Json(submission)))
}

/// GET /api/v1/forms/{id}/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<SubmissionListResponse>> {
    if !state.forms.exists(&form_id) {
        return Err(SubmissionError::FormNotFound(form_id).into());
    }

    let submissions = state.submissions.list_for_form(&form_id);
    let total = submissions.len();
    Ok(Json(SubmissionListResponse { submissions, total }))
}
