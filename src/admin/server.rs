//! Serve loop for the administrative endpoint.
//!
//! Unlike the request/response transport, connections are driven through
//! hyper-util directly so the header-read and idle timeouts can be applied
//! per connection.

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo, TokioTimer};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;

use super::AdminEndpoint;
use crate::config::AdminTimeouts;
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::net::idle::IdleTimeoutStream;
use crate::net::listener;
use crate::transport::{stop_serving, Completion, CompletionSignal, ServeHandle, TransportError};

/// Transport wrapper around [`AdminEndpoint`].
pub struct AdminTransport {
    addr: String,
    timeouts: AdminTimeouts,
    router: Option<Router>,
    handle: Option<ServeHandle>,
}

impl AdminTransport {
    pub fn new(endpoint: &AdminEndpoint) -> Self {
        Self {
            addr: endpoint.config().bind_address.clone(),
            timeouts: endpoint.config().timeouts,
            router: Some(endpoint.router()),
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
        let timeouts = self.timeouts;
        let (handle, signal) = ServeHandle::spawn(move |shutdown| async move {
            let listener = listener::bind(&name, &addr).await?;
            tracing::info!(transport = %name, address = %addr, "Admin server starting");
            serve(listener, router, timeouts, shutdown).await?;
            tracing::info!(transport = %name, "Admin server stopped");
            Ok(())
        });

        self.handle = Some(handle);
        signal
    }

    pub(crate) async fn stop(&mut self) -> Result<(), TransportError> {
        stop_serving(self.handle.as_mut()).await
    }
}

/// Pause after an accept failure that is not tied to a single connection.
const ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
    )
}

/// Accept the next connection, riding out transient failures.
///
/// Per-connection errors are skipped. Anything else (fd exhaustion, for
/// instance) is logged and retried after [`ACCEPT_BACKOFF`].
async fn next_connection<T, F, Fut>(mut accept: F) -> T
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<T>>,
{
    loop {
        match accept().await {
            Ok(conn) => return conn,
            Err(e) if is_connection_error(&e) => continue,
            Err(e) => {
                tracing::error!(error = %e, "Admin accept error, retrying");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
            }
        }
    }
}

async fn serve(
    listener: TcpListener,
    router: Router,
    timeouts: AdminTimeouts,
    shutdown: ShutdownSignal,
) -> Completion {
    // HTTP/1 only: the header-read deadline has no h2 counterpart.
    let mut builder = auto::Builder::new(TokioExecutor::new()).http1_only();
    builder
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read_header());

    let graceful = GracefulShutdown::new();
    let shutdown = shutdown.recv();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            (stream, peer_addr) = next_connection(|| listener.accept()) => {
                let io = TokioIo::new(IdleTimeoutStream::new(stream, timeouts.idle()));
                let service = TowerToHyperService::new(router.clone());
                let conn = builder.serve_connection_with_upgrades(io, service);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        tracing::debug!(peer_addr = %peer_addr, error = %e, "Admin connection closed with error");
                    }
                });
            }
            _ = &mut shutdown => break,
        }
    }

    // Stop accepting before draining.
    drop(listener);
    graceful.shutdown().await;
    Ok(())
}
