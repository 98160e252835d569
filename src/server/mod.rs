//! Cardioscope Dev Server
//!
//! Serves the built frontend and forwards backend calls, built with Axum.
//!
//! # Endpoints
//!
//! - `ANY /api/*` - Forwarded to the configured backend
//! - `GET /health/live` - Liveness probe
//! - `GET /health` - Status including backend reachability
//! - everything else - Static files from the UI dist directory, falling
//!   back to `index.html` so client-side routes load on refresh
//!
//! # Example
//!
//! ```rust,ignore
//! use cardioscope::config::Config;
//! use cardioscope::server::{serve, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let state = AppState::new(config.server.clone(), &config.backend)?;
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ServerError, ServerResult};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let static_dir = Path::new(&state.config.static_dir);
    let static_files =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));
    let max_body_size = state.config.max_body_size;

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/api/*path", any(routes::proxy::forward))
        .nest("/health", health_routes)
        .fallback_service(static_files)
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the dev server
pub async fn serve(state: AppState) -> ServerResult<()> {
    let addr = state.config.addr();
    tracing::info!(
        backend = %state.backend_url,
        static_dir = %state.config.static_dir,
        "Forwarding /api to backend"
    );

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Cardioscope dev server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Cardioscope dev server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, ServerConfig};
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::IntoResponse,
        Json,
    };
    use serde_json::{json, Value};
    use tempfile::tempdir;
    use tower::util::ServiceExt;

    fn create_test_app(backend_url: &str, static_dir: &Path) -> Router {
        let server = ServerConfig {
            static_dir: static_dir.to_string_lossy().to_string(),
            ..Default::default()
        };
        let backend = BackendConfig {
            url: backend_url.to_string(),
            request_timeout_secs: 5,
        };
        build_router(AppState::new(server, &backend).unwrap())
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn spawn_backend() -> String {
        async fn patients(headers: axum::http::HeaderMap) -> impl IntoResponse {
            let cookie = headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            (
                [(header::SET_COOKIE, "SESSION=rotated; Path=/")],
                Json(json!({ "cookie": cookie })),
            )
        }

        let app = Router::new().route("/api/professional/getPatientsList", get(patients));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_health_live() {
        let dir = tempdir().unwrap();
        let app = create_test_app("http://127.0.0.1:1", dir.path());

        let response = app
            .oneshot(Request::builder().uri("/health/live").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_reports_unreachable_backend() {
        let dir = tempdir().unwrap();
        let app = create_test_app("http://127.0.0.1:1", dir.path());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["backend_url"], "http://127.0.0.1:1");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_bad_gateway() {
        let dir = tempdir().unwrap();
        let app = create_test_app("http://127.0.0.1:1", dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/login")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"username":"a","password":"b"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "BAD_GATEWAY");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_forwards_cookies_both_ways() {
        let dir = tempdir().unwrap();
        let backend = spawn_backend().await;
        let app = create_test_app(&backend, dir.path());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/professional/getPatientsList")
                    .header(header::COOKIE, "SESSION=abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::SET_COOKIE).unwrap(),
            "SESSION=rotated; Path=/"
        );
        let body = body_json(response).await;
        assert_eq!(body["cookie"], "SESSION=abc");
    }

    #[tokio::test]
    async fn test_client_routes_fall_back_to_index() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<div id=\"app\"></div>").unwrap();
        let app = create_test_app("http://127.0.0.1:1", dir.path());

        let response = app
            .oneshot(Request::builder().uri("/professional").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<div id=\"app\"></div>");
    }
}
