//! Administrative endpoint served by a running supervisor.

use std::time::Duration;
use transport_supervisor::health::Component;
use transport_supervisor::observability::metrics::detached_handle;
use transport_supervisor::transport::BoxError;
use transport_supervisor::SupervisorBuilder;

mod common;

#[tokio::test]
async fn test_admin_routes_over_http() {
    let admin = "127.0.0.1:28541";
    let (controllable, stop) = common::controllable_transport();

    let handle = SupervisorBuilder::new()
        .with_admin_addr(admin)
        .with_admin_request_logging(true)
        .with_metrics_handle(detached_handle())
        .add_healthz_metadata("service", "ledger")
        .with_healthz_component(Component::new("db", || async { Ok::<(), BoxError>(()) }))
        .with_custom("worker", controllable)
        .build()
        .unwrap()
        .spawn();

    common::wait_for_listener(admin).await;
    let client = common::client();

    let res = client.get(format!("http://{}/healthz", admin)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["metadata"]["service"], "ledger");
    assert_eq!(json["components"][0]["name"], "db");
    assert_eq!(json["components"][0]["healthy"], true);

    let res = client.get(format!("http://{}/metrics", admin)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    let content_type = res.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/plain"));

    let res = client.get(format!("http://{}/anything", admin)).send().await.unwrap();
    assert_eq!(res.status(), 404);
    assert!(res.bytes().await.unwrap().is_empty());

    drop(stop);
    let result = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("group should end once the worker exits");
    assert!(result.is_ok(), "clean worker exit yields no error: {result:?}");
}

#[tokio::test]
async fn test_unhealthy_component_returns_503() {
    let admin = "127.0.0.1:28542";
    let (controllable, fail) = common::controllable_transport();

    let handle = SupervisorBuilder::new()
        .with_admin_addr(admin)
        .with_metrics_handle(detached_handle())
        .with_healthz_component(Component::new("upstream", || async {
            Err::<(), BoxError>("unreachable".into())
        }))
        .with_custom("worker", controllable)
        .build()
        .unwrap()
        .spawn();

    common::wait_for_listener(admin).await;

    let res = common::client()
        .get(format!("http://{}/healthz", admin))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 503);
    let json: serde_json::Value = res.json().await.unwrap();
    assert_eq!(json["status"], "unhealthy");
    assert_eq!(json["components"][0]["error"], "unreachable");

    fail.send("done".to_string()).unwrap();
    let err = tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap_err();
    assert_eq!(err.transport(), Some("worker"));
}
