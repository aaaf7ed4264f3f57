//! Application builder: wires router + middleware + state into an Axum app.

use std::time::Duration;

use axum::{Router, middleware as axum_middleware};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(TimeoutLayer::new(timeout))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_middleware::from_fn(request_logging))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use inbound_core::config::AppConfig;
    use inbound_core::result::AppResult;
    use inbound_core::traits::{MailQueue, MalwareScanner};
    use inbound_core::types::{FileRef, JobId, MailMessage, ScanVerdict};
    use inbound_database::Stores;

    use super::*;

    #[derive(Debug)]
    struct CleanScanner;

    #[async_trait]
    impl MalwareScanner for CleanScanner {
        async fn scan(&self, _file: &FileRef) -> ScanVerdict {
            ScanVerdict::Clean
        }
    }

    struct NullQueue;

    #[async_trait]
    impl MailQueue for NullQueue {
        async fn enqueue_mail(&self, _mail: MailMessage) -> AppResult<JobId> {
            Ok(JobId::new())
        }
    }

    fn app() -> Router {
        let state = AppState::new(
            AppConfig::default(),
            Stores::memory(),
            Arc::new(CleanScanner),
            Arc::new(NullQueue),
        );
        build_app(state)
    }

    #[tokio::test]
    async fn test_health_through_full_stack() {
        let resp = app()
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_preflight_is_answered_by_cors_layer() {
        let resp = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/reverse-shares/invite")
                    .header("Origin", "https://app.example.com")
                    .header("Access-Control-Request-Method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().contains_key("access-control-allow-origin"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let resp = app()
            .oneshot(Request::get("/api/files").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
