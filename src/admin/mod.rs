//! Administrative endpoint.
//!
//! # Routes
//! - `/healthz` → health aggregator report (200 healthy, 503 otherwise)
//! - `/metrics` → Prometheus exposition text
//! - anything else → 404, empty body
//!
//! # Design Decisions
//! - Request logging is a field of `AdminConfig`, not process-global state
//! - Timeouts (read, read-header, write, idle) apply to this endpoint only

pub mod handlers;
pub mod request_log;
pub mod server;

use axum::{http::StatusCode, middleware, routing::any, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

use crate::config::AdminConfig;
use crate::health::Healthz;
use self::handlers::{healthz, metrics_text, not_found};
use self::request_log::{count_request, log_request};

pub use server::AdminTransport;

/// Collaborators the admin handlers delegate to.
#[derive(Clone)]
pub struct AdminState {
    pub health: Arc<Healthz>,
    pub metrics: PrometheusHandle,
}

/// Router plus configuration for the fixed administrative server.
#[derive(Clone)]
pub struct AdminEndpoint {
    state: AdminState,
    config: AdminConfig,
}

impl AdminEndpoint {
    pub fn new(config: AdminConfig, health: Arc<Healthz>, metrics: PrometheusHandle) -> Self {
        Self {
            state: AdminState { health, metrics },
            config,
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn health(&self) -> &Arc<Healthz> {
        &self.state.health
    }

    pub fn router(&self) -> Router {
        setup_admin_router(self.state.clone(), &self.config)
    }
}

pub fn setup_admin_router(state: AdminState, config: &AdminConfig) -> Router {
    let mut router = Router::new()
        .route("/healthz", any(healthz))
        .route("/metrics", any(metrics_text))
        .fallback(not_found)
        .with_state(state);

    if config.log_requests {
        router = router.layer(middleware::from_fn(log_request));
    }

    router
        .layer(middleware::from_fn(count_request))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.timeouts.write(),
        ))
        .layer(RequestBodyTimeoutLayer::new(config.timeouts.read()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::Component;
    use crate::observability::metrics::detached_handle;
    use crate::transport::BoxError;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use std::collections::BTreeMap;
    use std::time::Duration;
    use tower::ServiceExt;

    fn endpoint(health: Healthz, log_requests: bool) -> AdminEndpoint {
        let config = AdminConfig {
            log_requests,
            ..AdminConfig::default()
        };
        AdminEndpoint::new(config, Arc::new(health), detached_handle())
    }

    async fn call(router: Router, method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn unknown_path_is_empty_404() {
        let router = endpoint(Healthz::default(), false).router();
        let (status, body) = call(router, Method::GET, "/anything").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn healthz_reflects_started_flag() {
        let endpoint = endpoint(Healthz::default(), true);

        let (status, body) = call(endpoint.router(), Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("\"starting\""));

        endpoint.health().started();
        let (status, body) = call(endpoint.router(), Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"ok\""));
    }

    #[tokio::test]
    async fn healthz_reports_failing_component() {
        let mut metadata = BTreeMap::new();
        metadata.insert("region".to_string(), "eu-west-1".to_string());
        let health = Healthz::new(
            metadata,
            vec![Component::new("queue", || async { Err::<(), BoxError>("down".into()) })],
        );
        health.started();

        let (status, body) = call(endpoint(health, false).router(), Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["metadata"]["region"], "eu-west-1");
        assert_eq!(json["components"][0]["name"], "queue");
        assert_eq!(json["components"][0]["error"], "down");
    }

    #[tokio::test]
    async fn metrics_returns_exposition_text() {
        let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            metrics::counter!("demo_events_total").increment(3);
        });

        let endpoint = AdminEndpoint::new(AdminConfig::default(), Arc::new(Healthz::default()), handle);
        let (status, body) = call(endpoint.router(), Method::GET, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("demo_events_total 3"));
    }

    #[tokio::test]
    async fn slow_response_hits_write_timeout() {
        let mut config = AdminConfig::default();
        config.timeouts.write_secs = 1;
        let health = Healthz::new(
            BTreeMap::new(),
            vec![Component::new("slow", || async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                Ok::<(), BoxError>(())
            })],
        )
        .with_check_timeout(Duration::from_secs(10));
        health.started();

        let endpoint = AdminEndpoint::new(config, Arc::new(health), detached_handle());
        let (status, _) = call(endpoint.router(), Method::GET, "/healthz").await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn routes_ignore_method() {
        let router = endpoint(Healthz::default(), false).router();
        let (status, _) = call(router, Method::POST, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
    }
}
