//! Transport subsystem.
//!
//! # Data Flow
//! ```text
//! SupervisorBuilder registration
//!     → TransportManager { name, variant }
//!
//! start():
//!     spawn serve task → bind (net::listener) → serve loop
//!     → CompletionSignal (one value: Ok on clean exit, Err otherwise)
//!
//! stop():
//!     trigger Shutdown → serve loop drains → wait for loop exit
//! ```
//!
//! # Design Decisions
//! - Closed set of variants: RPC (tonic), HTTP (axum), custom, admin
//! - `start` never blocks; bind failures travel through the signal
//! - `stop` before `start` and repeated `stop` are no-ops
//! - No deadline at this layer; the supervisor may impose one

pub mod custom;
pub mod error;
pub mod http;
pub mod rpc;
pub mod signal;

pub use custom::CustomTransport;
pub use error::{BoxError, TransportError};
pub use http::HttpTransport;
pub use rpc::RpcTransport;
pub use signal::{Completion, CompletionSender, CompletionSignal};

use std::future::Future;
use tokio::sync::watch;

use crate::admin::AdminTransport;
use crate::lifecycle::shutdown::{Shutdown, ShutdownSignal};

/// Name under which the administrative transport is registered.
pub const ADMIN_TRANSPORT_NAME: &str = "admin";

/// The fixed set of serving technologies the supervisor manages.
pub enum TransportVariant {
    Rpc(RpcTransport),
    Http(HttpTransport),
    Custom(CustomTransport),
    Admin(AdminTransport),
}

/// Uniform start/stop handle over one named transport.
pub struct TransportManager {
    name: String,
    variant: TransportVariant,
}

impl TransportManager {
    pub fn new(name: impl Into<String>, variant: TransportVariant) -> Self {
        Self {
            name: name.into(),
            variant,
        }
    }

    /// RPC-style transport serving `routes` on `addr`.
    pub fn rpc(name: impl Into<String>, addr: impl Into<String>, routes: tonic::service::Routes) -> Self {
        Self::new(name, TransportVariant::Rpc(RpcTransport::new(addr, routes)))
    }

    /// Request/response transport serving `router` on `addr`.
    pub fn http(name: impl Into<String>, addr: impl Into<String>, router: axum::Router) -> Self {
        Self::new(name, TransportVariant::Http(HttpTransport::new(addr, router)))
    }

    /// User-defined transport.
    pub fn custom(name: impl Into<String>, transport: CustomTransport) -> Self {
        Self::new(name, TransportVariant::Custom(transport))
    }

    pub(crate) fn admin(transport: AdminTransport) -> Self {
        Self::new(ADMIN_TRANSPORT_NAME, TransportVariant::Admin(transport))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short label for the variant, used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self.variant {
            TransportVariant::Rpc(_) => "rpc",
            TransportVariant::Http(_) => "http",
            TransportVariant::Custom(_) => "custom",
            TransportVariant::Admin(_) => "admin",
        }
    }

    /// Begin serving in the background and return the completion signal.
    pub fn start(&mut self) -> CompletionSignal {
        tracing::debug!(transport = %self.name, kind = self.kind(), "Starting transport");
        match &mut self.variant {
            TransportVariant::Rpc(t) => t.start(&self.name),
            TransportVariant::Http(t) => t.start(&self.name),
            TransportVariant::Custom(t) => t.start(&self.name),
            TransportVariant::Admin(t) => t.start(&self.name),
        }
    }

    /// Request graceful termination and wait for it.
    pub async fn stop(&mut self) -> Result<(), TransportError> {
        tracing::debug!(transport = %self.name, kind = self.kind(), "Stopping transport");
        match &mut self.variant {
            TransportVariant::Rpc(t) => t.stop().await,
            TransportVariant::Http(t) => t.stop().await,
            TransportVariant::Custom(t) => t.stop().await,
            TransportVariant::Admin(t) => t.stop().await,
        }
    }
}

impl std::fmt::Debug for TransportManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportManager")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Running serve loop owned by a listener-based transport.
#[derive(Debug)]
pub(crate) struct ServeHandle {
    shutdown: Shutdown,
    finished: watch::Receiver<bool>,
}

impl ServeHandle {
    /// Spawn `serve` on the runtime, wiring up shutdown and completion.
    pub(crate) fn spawn<F, Fut>(serve: F) -> (ServeHandle, CompletionSignal)
    where
        F: FnOnce(ShutdownSignal) -> Fut,
        Fut: Future<Output = Completion> + Send + 'static,
    {
        let shutdown = Shutdown::new();
        let (finished_tx, finished) = watch::channel(false);
        let (completion, signal) = CompletionSignal::channel();

        let fut = serve(shutdown.subscribe());
        tokio::spawn(async move {
            let result = fut.await;
            finished_tx.send_replace(true);
            completion.complete(result);
        });

        (ServeHandle { shutdown, finished }, signal)
    }

    /// Trigger shutdown and wait until the serve loop has returned.
    pub(crate) async fn stop(&mut self) {
        self.shutdown.trigger();
        // An error means the task is gone (panicked), which is also stopped.
        let _ = self.finished.wait_for(|done| *done).await;
    }
}

/// Stop the serve loop behind `handle`, if one was started.
pub(crate) async fn stop_serving(handle: Option<&mut ServeHandle>) -> Result<(), TransportError> {
    if let Some(handle) = handle {
        handle.stop().await;
    }
    Ok(())
}
