//! Prometheus metrics for form-results dispatch.
//!
//! - Batch metrics (batches by result, batch duration)
//! - Recipient metrics (outcomes by kind)
//! - Send metrics (messages sent, send errors)
//! - Catalog gauges refreshed on scrape

mod helpers;

pub use helpers::{encode_metrics, CatalogMetrics, DispatchMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "formdispatch";

lazy_static! {
    // ============================================================================
    // Batch Metrics
    // ============================================================================

    /// Batches processed, labelled `completed` or by fatal code
    pub static ref BATCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_batches_total", METRIC_PREFIX),
        "Total batches processed by result",
        &["result"]
    ).unwrap();

    /// Wall time spent on one batch
    pub static ref BATCH_DURATION: Histogram = register_histogram!(
        format!("{}_batch_duration_seconds", METRIC_PREFIX),
        "Batch processing duration in seconds",
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0]
    ).unwrap();

    // ============================================================================
    // Recipient Metrics
    // ============================================================================

    /// Recipient verdicts by outcome kind
    pub static ref RECIPIENT_OUTCOMES_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_recipient_outcomes_total", METRIC_PREFIX),
        "Total recipient outcomes by kind",
        &["outcome"]
    ).unwrap();

    // ============================================================================
    // Send Metrics
    // ============================================================================

    /// Personalized messages accepted by the sender
    pub static ref SUBMISSIONS_SENT_TOTAL: IntCounter = register_int_counter!(
        format!("{}_submissions_sent_total", METRIC_PREFIX),
        "Total personalized messages accepted by the sender"
    ).unwrap();

    /// Personalized messages rejected by the sender
    pub static ref SEND_ERRORS_TOTAL: IntCounter = register_int_counter!(
        format!("{}_send_errors_total", METRIC_PREFIX),
        "Total personalized messages rejected by the sender"
    ).unwrap();

    // ============================================================================
    // Catalog Metrics
    // ============================================================================

    pub static ref ARTIFACTS_TOTAL: IntGauge = register_int_gauge!(
        format!("{}_artifacts_total", METRIC_PREFIX),
        "Number of stored artifacts"
    ).unwrap();

    pub static ref FORMS_TOTAL: IntGauge = register_int_gauge!(
        format!("{}_forms_total", METRIC_PREFIX),
        "Number of stored forms"
    ).unwrap();

    pub static ref SUBMISSIONS_STORED: IntGauge = register_int_gauge!(
        format!("{}_submissions_stored", METRIC_PREFIX),
        "Number of stored form submissions"
    ).unwrap();
}
