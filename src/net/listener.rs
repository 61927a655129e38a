//! TCP listener binding for transports.
//!
//! # Responsibilities
//! - Normalise configured bind addresses (`:8001` shorthand)
//! - Bind the listener and report failures as [`TransportError::Bind`]

use tokio::net::TcpListener;

use crate::transport::TransportError;

/// Expand the `:PORT` shorthand to an all-interfaces address.
///
/// Anything else is returned unchanged and resolved by the OS at bind time.
pub fn normalize_addr(addr: &str) -> String {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{}", port),
        None => addr.to_string(),
    }
}

/// Bind a TCP listener for the transport `name`.
pub async fn bind(name: &str, addr: &str) -> Result<TcpListener, TransportError> {
    let resolved = normalize_addr(addr);

    let listener = TcpListener::bind(&resolved)
        .await
        .map_err(|source| TransportError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let local_addr = listener.local_addr().map_err(|source| TransportError::Bind {
        addr: addr.to_string(),
        source,
    })?;

    tracing::info!(
        transport = %name,
        address = %local_addr,
        "Listener bound"
    );

    Ok(listener)
}
