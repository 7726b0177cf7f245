//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (housing dataset loads)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use super::run_blocking;
use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe.
/// Returns 200 once the primary dataset can be loaded.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_housing_data(&state).await {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let data_ok = check_housing_data(&state).await;

    Json(HealthResponse {
        status: if data_ok { "healthy" } else { "unhealthy" }.to_string(),
        housing_data: if data_ok { "ok" } else { "error" }.to_string(),
        cached: state.dashboard.is_loaded(),
        address: state.config.addr(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Load (or hit the cache for) the primary dataset
async fn check_housing_data(state: &AppState) -> bool {
    let dashboard = Arc::clone(&state.dashboard);
    match run_blocking(move || Ok(dashboard.housing().is_ok())).await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Health check task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
