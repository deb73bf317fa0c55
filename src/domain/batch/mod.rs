//! Batch dispatch of form results.
//!
//! The campaign orchestrator hands over one event and the recipients pending
//! on it. The processor checks batch-level preconditions once, then sends
//! every recipient one personalized message per form submission and reports a
//! verdict per recipient.

mod action;
mod context;
mod outcome;
mod processor;

pub use action::{
    ActionDefinition, ActionRegistry, RegisteredAction, FORM_FIELD_VALUE_CONDITION,
    FORM_RESULTS_ACTION,
};
pub use context::{BatchContext, BatchEvent, BatchRequest, ParentCondition, PendingBatch};
pub use outcome::{BatchFatal, BatchReport, ChannelAttribution, DispatchOutcome, OutcomeSummary};
pub use processor::{BatchProcessor, BatchStats, BatchStatsSnapshot};
