//! Housing Dashboard HTTP API
//!
//! HTTP surface over the render pipeline, built with Axum.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /api/v1/options` - Sidebar widget choices and initial selection
//! - `GET /api/v1/dashboard` - Full view-model for a selection
//! - `GET /api/v1/table` - Filtered table as JSON or CSV
//! - `POST /api/v1/cache/invalidate` - Drop memoized tables
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /ws` - Re-render on every selection change
//!
//! # Example
//!
//! ```rust,ignore
//! use housing_dashboard::api::{serve, AppState};
//! use housing_dashboard::config::Config;
//! use housing_dashboard::dashboard::Dashboard;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let dashboard = Arc::new(Dashboard::new(config.data, config.cache));
//!
//!     let state = AppState::new(dashboard, config.api.clone());
//!     serve(state, &config.api).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::ApiConfig;
use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/options", get(routes::options::get_options))
        .route("/dashboard", get(routes::dashboard::render_dashboard))
        .route("/table", get(routes::table::export_table))
        .route("/cache/invalidate", post(routes::cache::invalidate_cache));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .route("/ws", get(websocket_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Housing dashboard listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Housing dashboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
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
    use crate::dashboard::render::fixtures::write_fixture_files;
    use crate::dashboard::Dashboard;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn create_test_app() -> (Router, TempDir) {
        let (dir, data, cache) = write_fixture_files(false);
        let dashboard = Arc::new(Dashboard::new(data, cache));
        let state = AppState::new(dashboard, ApiConfig::default());
        (build_router(state), dir)
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_live() {
        let (app, _dir) = create_test_app();
        let (status, _) = get_json(app, "/health/live").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready() {
        let (app, _dir) = create_test_app();
        let (status, _) = get_json(app, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_ready_without_data() {
        let (app, dir) = create_test_app();
        std::fs::remove_file(dir.path().join("df_merged.csv")).unwrap();
        let (status, _) = get_json(app, "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_health_full() {
        let (app, _dir) = create_test_app();
        let (status, body) = get_json(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["address"], "0.0.0.0:8501");
    }

    #[tokio::test]
    async fn test_options() {
        let (app, _dir) = create_test_app();
        let (status, body) = get_json(app, "/api/v1/options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["options"]["states"], serde_json::json!(["CA", "TX"]));
        assert_eq!(body["default_selection"]["state"], "CA");
    }

    #[tokio::test]
    async fn test_dashboard_default() {
        let (app, _dir) = create_test_app();
        let (status, body) = get_json(app, "/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["metric_cards"][0]["status"], "computed");
        assert_eq!(body["metric_cards"][0]["value"], "20 K");
        assert_eq!(body["metric_cards"][0]["delta"], "10%");
        assert_eq!(body["housing"]["table_caption"], "Filtered Data for CA");
    }

    #[tokio::test]
    async fn test_dashboard_selection() {
        let (app, _dir) = create_test_app();
        let (status, body) = get_json(
            app,
            "/api/v1/dashboard?state=TX&types=Condo&start=2020-01-31&end=2020-02-29",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["housing"]["table"].as_array().unwrap().len(), 2);
        assert_eq!(body["renting"]["rent_comparison"]["state"], "TX");
    }

    #[tokio::test]
    async fn test_dashboard_invalid_selection() {
        let (app, _dir) = create_test_app();
        let (status, body) = get_json(app, "/api/v1/dashboard?state=ZZ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_SELECTION");
    }

    #[tokio::test]
    async fn test_dashboard_bad_date() {
        let (app, _dir) = create_test_app();
        let (status, body) = get_json(app, "/api/v1/dashboard?start=soon").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_table_csv() {
        let (app, _dir) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/table?state=TX&format=csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("Abbrev,Date,Type,AvgPrice"));
        assert_eq!(text.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_table_csv_empty_selection_keeps_header() {
        let (app, _dir) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/table?state=TX&types=Single%20Family&format=csv")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Abbrev,Date,Type,AvgPrice\n");
    }

    #[tokio::test]
    async fn test_table_bad_format() {
        let (app, _dir) = create_test_app();
        let (status, _) = get_json(app, "/api/v1/table?format=xml").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalidate_cache() {
        let (app, _dir) = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/cache/invalidate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_data_file_is_server_error() {
        let (app, dir) = create_test_app();
        std::fs::remove_file(dir.path().join("df_mortgage_rates.csv")).unwrap();
        let (status, body) = get_json(app, "/api/v1/dashboard").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "DATA_ERROR");
    }
}
