//! Health Routes
//!
//! Health check endpoints for monitoring and container probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (content API reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub content_api: String,
    pub open_drafts: usize,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 once the content API answers.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_content_api(&state).await {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let cms_ok = check_content_api(&state).await;

    Json(HealthResponse {
        status: if cms_ok { "healthy" } else { "degraded" }.to_string(),
        content_api: if cms_ok { "ok" } else { "error" }.to_string(),
        open_drafts: state.drafts.len().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn check_content_api(state: &AppState) -> bool {
    match state.cms.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Content API health check failed");
            false
        }
    }
}
