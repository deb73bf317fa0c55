//! Health check and statistics endpoints.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::domain::batch::BatchStatsSnapshot;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub actions: usize,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub batches: BatchStatsSnapshot,
    pub catalog: CatalogStats,
    pub outbox: OutboxStats,
}

#[derive(Debug, Serialize)]
pub struct CatalogStats {
    pub artifacts: usize,
    pub forms: usize,
    pub submissions: usize,
}

#[derive(Debug, Serialize)]
pub struct OutboxStats {
    pub messages: usize,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        actions: state.actions.len(),
    })
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse {
        batches: state.processor.stats(),
        catalog: CatalogStats {
            artifacts: state.artifacts.count(),
            forms: state.forms.count(),
            submissions: state.submissions.count(),
        },
        outbox: OutboxStats {
            messages: state.outbox.count(),
        },
    })
}
