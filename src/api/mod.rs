//! API layer - HTTP endpoint handlers organized by domain.

mod artifacts;
mod batches;
mod forms;
mod health;
mod metrics;
mod outbox;
mod routes;

pub use artifacts::{
    create_artifact, delete_artifact, get_artifact, list_artifacts, publish_artifact,
    unpublish_artifact,
};
pub use batches::{list_actions, run_batch, BatchResponse, FatalInfo};
pub use forms::{create_form, create_submission, get_form, list_forms, list_submissions};
pub use health::{health, stats};
pub use metrics::prometheus_metrics;
pub use outbox::{add_do_not_contact, force_failure, list_outbox};
pub use routes::api_routes;
