use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::server::{api_key_auth, AppState};

use super::artifacts::{
    create_artifact, delete_artifact, get_artifact, list_artifacts, publish_artifact,
    unpublish_artifact,
};
use super::batches::{list_actions, run_batch};
use super::forms::{create_form, create_submission, get_form, list_forms, list_submissions};
use super::health::{health, stats};
use super::metrics::prometheus_metrics;
use super::outbox::{add_do_not_contact, force_failure, list_outbox};

pub fn api_routes(state: AppState) -> Router<AppState> {
    let v1 = Router::new()
        // Artifacts
        .route("/artifacts", get(list_artifacts).post(create_artifact))
        .route("/artifacts/{id}", get(get_artifact).delete(delete_artifact))
        .route("/artifacts/{id}/publish", post(publish_artifact))
        .route("/artifacts/{id}/unpublish", post(unpublish_artifact))
        // Forms & submissions
        .route("/forms", get(list_forms).post(create_form))
        .route("/forms/{id}", get(get_form))
        .route(
            "/forms/{id}/submissions",
            get(list_submissions).post(create_submission),
        )
        // Batch actions
        .route("/actions", get(list_actions))
        .route("/batches", post(run_batch))
        // Outbox
        .route("/outbox", get(list_outbox))
        .route("/outbox/do-not-contact", post(add_do_not_contact))
        .route("/outbox/failures", post(force_failure))
        .route_layer(middleware::from_fn_with_state(state, api_key_auth));

    Router::new()
        // Health, stats & metrics
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
        .nest("/api/v1", v1)
}
