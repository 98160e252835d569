//! Backend Proxy
//!
//! `ANY /api/*` is forwarded to the backend with the same path, query,
//! method, headers and body, so the browser can call the backend on its own
//! origin. Session cookies pass through in both directions.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderName, HeaderValue, StatusCode},
    response::Response,
};
use std::sync::Arc;

use crate::server::error::{ServerError, ServerResult};
use crate::server::state::AppState;

/// Headers owned by each hop and never forwarded
const HOP_HEADERS: [&str; 5] = [
    "host",
    "connection",
    "content-length",
    "transfer-encoding",
    "keep-alive",
];

fn is_hop_header(name: &str) -> bool {
    HOP_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Forward one request to the backend
pub async fn forward(State(state): State<Arc<AppState>>, request: Request) -> ServerResult<Response> {
    let (parts, body) = request.into_parts();

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| parts.uri.path());
    let url = format!("{}{}", state.backend_url, path_and_query);

    let body = to_bytes(body, state.config.max_body_size)
        .await
        .map_err(|e| ServerError::PayloadTooLarge(e.to_string()))?;

    let method = reqwest::Method::from_bytes(parts.method.as_str().as_bytes())
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    let mut upstream = state.http.request(method, &url).body(body.to_vec());
    for (name, value) in parts.headers.iter() {
        if !is_hop_header(name.as_str()) {
            upstream = upstream.header(name.as_str(), value.as_bytes());
        }
    }

    tracing::debug!(method = %parts.method, url = %url, "Forwarding to backend");

    let upstream = upstream
        .send()
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;

    let status = StatusCode::from_u16(upstream.status().as_u16())
        .map_err(|e| ServerError::Internal(e.to_string()))?;

    let mut headers = Vec::new();
    for (name, value) in upstream.headers().iter() {
        if is_hop_header(name.as_str()) {
            continue;
        }
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            headers.push((name, value));
        }
    }

    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| ServerError::Upstream(e.to_string()))?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    for (name, value) in headers {
        response.headers_mut().append(name, value);
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_headers() {
        assert!(is_hop_header("Host"));
        assert!(is_hop_header("transfer-encoding"));
        assert!(!is_hop_header("cookie"));
        assert!(!is_hop_header("set-cookie"));
    }
}
