//! Request/response transport backed by an axum router.

use std::net::SocketAddr;

use super::{stop_serving, CompletionSignal, ServeHandle, TransportError};
use crate::net::listener;

/// Serves an externally constructed axum `Router` on a TCP address.
///
/// Stop uses axum's graceful shutdown: no new connections, in-flight
/// requests complete, no deadline.
pub struct HttpTransport {
    addr: String,
    router: Option<axum::Router>,
    handle: Option<ServeHandle>,
}

impl HttpTransport {
    pub fn new(addr: impl Into<String>, router: axum::Router) -> Self {
        Self {
            addr: addr.into(),
            router: Some(router),
            handle: None,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub(crate) fn start(&mut self, name: &str) -> CompletionSignal {
        let Some(router) = self.router.take() else {
            return CompletionSignal::ready(Err(TransportError::AlreadyStarted));
        };

        let name = name.to_string();
        let addr = self.addr.clone();
        let (handle, signal) = ServeHandle::spawn(move |shutdown| async move {
            let listener = listener::bind(&name, &addr).await?;
            tracing::info!(transport = %name, address = %addr, "HTTP server starting");

            let app = router.into_make_service_with_connect_info::<SocketAddr>();
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.recv())
                .await
                .map_err(TransportError::Serve)?;

            tracing::info!(transport = %name, "HTTP server stopped");
            Ok(())
        });

        self.handle = Some(handle);
        signal
    }

    pub(crate) async fn stop(&mut self) -> Result<(), TransportError> {
        stop_serving(self.handle.as_mut()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use std::time::Duration;

    #[tokio::test]
    async fn serves_router_until_stopped() {
        let addr = "127.0.0.1:28411";
        let router = axum::Router::new().route("/ping", get(|| async { "pong" }));
        let mut transport = HttpTransport::new(addr, router);
        let signal = transport.start("http-test");

        tokio::time::sleep(Duration::from_millis(100)).await;
        let body = reqwest::Client::builder()
            .no_proxy()
            .build()
            .unwrap()
            .get(format!("http://{}/ping", addr))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");

        transport.stop().await.unwrap();
        let result = tokio::time::timeout(Duration::from_secs(2), signal)
            .await
            .expect("signal should resolve after stop");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn invalid_address_fails_to_bind() {
        let mut transport = HttpTransport::new("invalid address", axum::Router::new());
        let result = transport.start("http-test").await;
        assert!(matches!(result, Err(TransportError::Bind { .. })));
        // The loop already exited; stopping afterwards must not hang.
        transport.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_before_start_is_noop() {
        let mut transport = HttpTransport::new("127.0.0.1:0", axum::Router::new());
        transport.stop().await.unwrap();
        transport.stop().await.unwrap();
    }
}
