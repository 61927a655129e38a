//! End-to-end supervision scenarios with real listeners.

use axum::routing::get;
use std::time::Duration;
use tonic::service::Routes;
use transport_supervisor::observability::metrics::detached_handle;
use transport_supervisor::{SupervisorBuilder, SupervisorError, TransportError};

mod common;

#[tokio::test]
async fn test_http_bind_failure_stops_rpc_and_admin() {
    let rpc_a = "127.0.0.1:28511";
    let rpc_b = "127.0.0.1:28512";
    let admin = "127.0.0.1:28513";

    let supervisor = SupervisorBuilder::new()
        .with_admin_addr(admin)
        .with_metrics_handle(detached_handle())
        .with_rpc_server("rpc-a", rpc_a, Routes::default())
        .with_rpc_server("rpc-b", rpc_b, Routes::default())
        .with_http_server("web", "not a valid address", axum::Router::new())
        .build()
        .unwrap();

    let err = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
        .await
        .expect("group should shut down")
        .unwrap_err();

    match &err {
        SupervisorError::Transport { transport, source, stop_failures } => {
            assert_eq!(transport, "web");
            assert!(source.is_bind(), "expected bind error, got {source}");
            assert!(stop_failures.is_empty());
        }
        other => panic!("unexpected error {other:?}"),
    }

    // Every survivor was stopped and its serve loop has returned.
    assert!(common::port_is_free(rpc_a).await);
    assert!(common::port_is_free(rpc_b).await);
    assert!(common::port_is_free(admin).await);
}

#[tokio::test]
async fn test_result_waits_until_controllable_transport_fails() {
    let rpc = "127.0.0.1:28521";
    let web = "127.0.0.1:28522";
    let admin = "127.0.0.1:28523";

    let (controllable, fail) = common::controllable_transport();
    let router = axum::Router::new().route("/hello", get(|| async { "hello" }));

    let mut handle = SupervisorBuilder::new()
        .with_admin_addr(admin)
        .with_metrics_handle(detached_handle())
        .with_rpc_server("rpc", rpc, Routes::default())
        .with_http_server("web", web, router)
        .with_custom("controllable", controllable)
        .build()
        .unwrap()
        .spawn();

    common::wait_for_listener(web).await;
    common::wait_for_listener(admin).await;

    let client = common::client();
    let body = client
        .get(format!("http://{}/hello", web))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "hello");

    let health = client
        .get(format!("http://{}/healthz", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(health.status(), 200);

    let still_running = tokio::time::timeout(Duration::from_millis(500), &mut handle).await;
    assert!(still_running.is_err(), "no transport has failed yet");

    fail.send("injected failure".to_string()).unwrap();
    let err = tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("result should follow the failure promptly")
        .unwrap_err();

    assert_eq!(err.transport(), Some("controllable"));
    match err {
        SupervisorError::Transport { source: TransportError::Custom(e), .. } => {
            assert_eq!(e.to_string(), "injected failure");
        }
        other => panic!("unexpected error {other:?}"),
    }

    assert!(common::port_is_free(rpc).await);
    assert!(common::port_is_free(web).await);
    assert!(common::port_is_free(admin).await);
}

#[tokio::test]
async fn test_admin_bind_failure_ends_group() {
    let web = "127.0.0.1:28531";
    let taken = tokio::net::TcpListener::bind("127.0.0.1:28532").await.unwrap();

    let supervisor = SupervisorBuilder::new()
        .with_admin_addr(taken.local_addr().unwrap().to_string())
        .with_metrics_handle(detached_handle())
        .with_http_server("web", web, axum::Router::new())
        .build()
        .unwrap();

    let err = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
        .await
        .expect("group should shut down")
        .unwrap_err();

    assert_eq!(err.transport(), Some("admin"));
    assert!(common::port_is_free(web).await);
}
