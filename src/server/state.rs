use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::domain::batch::{ActionRegistry, BatchProcessor};
use crate::domain::catalog::{MemoryArtifactStore, MemoryFormStore};
use crate::domain::recipient::DispatchGate;
use crate::domain::sender::OutboxSender;
use crate::domain::submission::MemorySubmissionStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub artifacts: Arc<MemoryArtifactStore>,
    pub forms: Arc<MemoryFormStore>,
    pub submissions: Arc<MemorySubmissionStore>,
    pub outbox: Arc<OutboxSender>,
    pub processor: Arc<BatchProcessor>,
    pub actions: Arc<ActionRegistry>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let artifacts = Arc::new(MemoryArtifactStore::new());
        let forms = Arc::new(MemoryFormStore::new());
        let submissions = Arc::new(MemorySubmissionStore::new());
        let outbox = Arc::new(
            OutboxSender::new(settings.dispatch.address_field.clone())
                .with_capacity(settings.dispatch.outbox_capacity),
        );

        let processor = Arc::new(
            BatchProcessor::new(artifacts.clone(), forms.clone(), submissions.clone())
                .with_gate(DispatchGate::new(settings.dispatch.address_field.clone()))
                .with_max_concurrent(settings.dispatch.max_concurrent_recipients)
                .with_send_flags(
                    settings.dispatch.return_errors,
                    settings.dispatch.dnc_as_error,
                ),
        );

        let actions = Arc::new(ActionRegistry::new());
        actions.register(processor.clone());

        tracing::info!(
            address_field = %settings.dispatch.address_field,
            max_concurrent_recipients = settings.dispatch.max_concurrent_recipients,
            outbox_capacity = settings.dispatch.outbox_capacity,
            "Using in-memory stores and outbox sender"
        );

        Self {
            settings: Arc::new(settings),
            artifacts,
            forms,
            submissions,
            outbox,
            processor,
            actions,
            start_time: Instant::now(),
        }
    }
}
