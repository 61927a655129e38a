//! RPC-style transport backed by a tonic server.
//!
//! Stop is a graceful drain: the listener stops accepting, in-flight calls
//! finish, then the serve loop returns. No deadline is applied here.

use tokio_stream::wrappers::TcpListenerStream;
use tonic::service::Routes;
use tonic::transport::Server;

use super::{stop_serving, CompletionSignal, ServeHandle, TransportError};
use crate::net::listener;

/// Serves externally constructed tonic routes on a TCP address.
pub struct RpcTransport {
    addr: String,
    routes: Option<Routes>,
    handle: Option<ServeHandle>,
}

impl RpcTransport {
    pub fn new(addr: impl Into<String>, routes: Routes) -> Self {
        Self {
            addr: addr.into(),
            routes: Some(routes),
            handle: None,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub(crate) fn start(&mut self, name: &str) -> CompletionSignal {
        let Some(routes) = self.routes.take() else {
            return CompletionSignal::ready(Err(TransportError::AlreadyStarted));
        };

        let name = name.to_string();
        let addr = self.addr.clone();
        let (handle, signal) = ServeHandle::spawn(move |shutdown| async move {
            let listener = listener::bind(&name, &addr).await?;
            tracing::info!(transport = %name, address = %addr, "RPC server starting");

            Server::builder()
                .add_routes(routes)
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown.recv())
                .await?;

            tracing::info!(transport = %name, "RPC server stopped");
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
    use std::time::Duration;

    #[tokio::test]
    async fn stop_drains_and_completes_cleanly() {
        let mut transport = RpcTransport::new("127.0.0.1:0", Routes::default());
        let signal = transport.start("rpc-test");

        tokio::time::sleep(Duration::from_millis(100)).await;
        transport.stop().await.unwrap();

        let result = tokio::time::timeout(Duration::from_secs(2), signal)
            .await
            .expect("signal should resolve after stop");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn bind_failure_is_delivered_through_signal() {
        let mut transport = RpcTransport::new("not-an-address", Routes::default());
        let result = transport.start("rpc-test").await;
        assert!(matches!(result, Err(TransportError::Bind { .. })));
    }

    #[tokio::test]
    async fn second_start_reports_already_started() {
        let mut transport = RpcTransport::new("127.0.0.1:0", Routes::default());
        let _first = transport.start("rpc-test");
        let second = transport.start("rpc-test").await;
        assert!(matches!(second, Err(TransportError::AlreadyStarted)));
        transport.stop().await.unwrap();
    }

    #[tokio::test]
    async fn stop_before_start_and_twice_is_harmless() {
        let mut transport = RpcTransport::new("127.0.0.1:0", Routes::default());
        transport.stop().await.unwrap();
        let _signal = transport.start("rpc-test");
        transport.stop().await.unwrap();
        transport.stop().await.unwrap();
    }
}
