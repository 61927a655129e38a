//! OS signal handling.
//!
//! SIGINT/SIGTERM are surfaced as a custom transport that completes cleanly,
//! so an operator signal ends the group through the same first-completion
//! path as any other transport.

use std::io;
use tokio::sync::oneshot;

use crate::transport::CustomTransport;

/// Resolve on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() -> io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate = signal(SignalKind::terminate())?;
        tokio::select! {
            res = tokio::signal::ctrl_c() => res?,
            _ = terminate.recv() => {}
        }
    }

    #[cfg(not(unix))]
    tokio::signal::ctrl_c().await?;

    Ok(())
}

/// A transport that exits when the process receives a shutdown signal.
///
/// Stopping it releases the signal wait without exiting the process.
pub fn signal_transport() -> CustomTransport {
    let (release_tx, release_rx) = oneshot::channel::<()>();

    CustomTransport::new(move || async move {
        tokio::select! {
            res = shutdown_signal() => {
                res?;
                tracing::info!("Shutdown signal received");
            }
            _ = release_rx => {}
        }
        Ok::<(), io::Error>(())
    })
    .with_shutdown(move || async move {
        let _ = release_tx.send(());
        Ok::<(), io::Error>(())
    })
}
