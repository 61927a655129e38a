//! Shared utilities for integration tests.

use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use transport_supervisor::transport::BoxError;
use transport_supervisor::CustomTransport;

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// Poll until something accepts connections on `addr`.
pub async fn wait_for_listener(addr: &str) {
    for _ in 0..50 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("nothing listening on {addr}");
}

/// Whether `addr` can be bound again, i.e. its previous listener is gone.
#[allow(dead_code)]
pub async fn port_is_free(addr: &str) -> bool {
    TcpListener::bind(addr).await.is_ok()
}

/// A custom transport that runs until told to fail with a message.
#[allow(dead_code)]
pub fn controllable_transport() -> (CustomTransport, oneshot::Sender<String>) {
    let (tx, rx) = oneshot::channel::<String>();
    let transport = CustomTransport::new(move || async move {
        match rx.await {
            Ok(message) => Err::<(), BoxError>(message.into()),
            Err(_) => Ok(()),
        }
    });
    (transport, tx)
}
