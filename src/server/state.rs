//! Application State
//!
//! Shared state accessible by all dev server handlers.

use reqwest::redirect::Policy;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::{BackendConfig, ServerConfig};

use super::error::ServerError;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Dev server configuration
    pub config: Arc<ServerConfig>,
    /// Origin `/api/*` requests are forwarded to
    pub backend_url: String,
    /// Upstream client. No cookie store and no redirect following, the
    /// browser sees the backend's responses as they are.
    pub http: Client,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig, backend: &BackendConfig) -> Result<Self, ServerError> {
        let http = Client::builder()
            .redirect(Policy::none())
            .timeout(Duration::from_secs(backend.request_timeout_secs))
            .build()
            .map_err(|e| ServerError::Internal(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            backend_url: backend.url.trim_end_matches('/').to_string(),
            http,
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
