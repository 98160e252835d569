//! Health Routes
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health - Status including backend reachability

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::endpoints;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy, or degraded when the backend does not answer
    pub status: String,
    pub backend_url: String,
    /// reachable or unreachable
    pub backend: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// GET /health/live
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let reachable = check_backend(&state).await;

    Json(HealthResponse {
        status: if reachable { "healthy" } else { "degraded" }.to_string(),
        backend_url: state.backend_url.clone(),
        backend: if reachable { "reachable" } else { "unreachable" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Any HTTP answer counts, an anonymous identity probe normally gets 401
async fn check_backend(state: &AppState) -> bool {
    let url = endpoints::join(&state.backend_url, endpoints::ME);
    match state.http.get(url).send().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Backend health probe failed");
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
