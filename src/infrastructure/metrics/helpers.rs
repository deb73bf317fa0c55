//! Metrics helper structs for convenient metric recording

use prometheus::{Encoder, TextEncoder};

use super::{
    ARTIFACTS_TOTAL, BATCHES_TOTAL, BATCH_DURATION, FORMS_TOTAL, RECIPIENT_OUTCOMES_TOTAL,
    SEND_ERRORS_TOTAL, SUBMISSIONS_SENT_TOTAL, SUBMISSIONS_STORED,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Helper struct for recording dispatch metrics
pub struct DispatchMetrics;

impl DispatchMetrics {
    /// Record a finished batch; `result` is `completed` or a fatal code
    pub fn record_batch(result: &str) {
        BATCHES_TOTAL.with_label_values(&[result]).inc();
    }

    pub fn observe_batch_duration(seconds: f64) {
        BATCH_DURATION.observe(seconds);
    }

    /// Record one recipient verdict
    pub fn record_outcome(outcome: &str) {
        RECIPIENT_OUTCOMES_TOTAL.with_label_values(&[outcome]).inc();
    }

    pub fn record_sent() {
        SUBMISSIONS_SENT_TOTAL.inc();
    }

    pub fn record_send_error() {
        SEND_ERRORS_TOTAL.inc();
    }
}

/// Helper struct for catalog gauges
pub struct CatalogMetrics;

impl CatalogMetrics {
    pub fn set_counts(artifacts: usize, forms: usize, submissions: usize) {
        ARTIFACTS_TOTAL.set(artifacts as i64);
        FORMS_TOTAL.set(forms as i64);
        SUBMISSIONS_STORED.set(submissions as i64);
    }
}
