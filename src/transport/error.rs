//! Transport error types.

use std::time::Duration;
use thiserror::Error;

/// Boxed error returned by user-supplied run/shutdown functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal and shutdown errors reported by a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serve loop failed: {0}")]
    Serve(#[source] std::io::Error),

    #[error("RPC server failed: {0}")]
    Rpc(#[from] tonic::transport::Error),

    #[error("custom transport failed: {0}")]
    Custom(#[source] BoxError),

    #[error("shutdown failed: {0}")]
    Shutdown(#[source] BoxError),

    #[error("transport already started")]
    AlreadyStarted,

    #[error("transport task ended without reporting a result")]
    Abandoned,

    #[error("stop did not complete within {0:?}")]
    StopTimeout(Duration),
}

impl TransportError {
    /// Whether this error came from binding the listener.
    pub fn is_bind(&self) -> bool {
        matches!(self, TransportError::Bind { .. })
    }
}
