//! User-defined transport: a run/shutdown function pair.

use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;

use super::{BoxError, CompletionSignal, TransportError};

type RunFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), BoxError>> + Send>;
type ShutdownFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), BoxError>> + Send>;

/// Transport driven by caller-supplied functions.
///
/// `run` is invoked once on start and its return value is the terminal
/// result. `shutdown`, when present, is invoked at most once on stop, and
/// only if the transport was started.
///
/// ```no_run
/// use transport_supervisor::transport::CustomTransport;
///
/// let (tx, rx) = tokio::sync::oneshot::channel::<()>();
/// let transport = CustomTransport::new(move || async move {
///     let _ = rx.await;
///     Ok::<(), std::io::Error>(())
/// })
/// .with_shutdown(move || async move {
///     let _ = tx.send(());
///     Ok::<(), std::io::Error>(())
/// });
/// ```
pub struct CustomTransport {
    run: Option<RunFn>,
    shutdown: Option<ShutdownFn>,
    started: bool,
}

impl CustomTransport {
    pub fn new<F, Fut, E>(run: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        Self {
            run: Some(Box::new(move || run().map(|res| res.map_err(Into::<BoxError>::into)).boxed())),
            shutdown: None,
            started: false,
        }
    }

    /// Attach the function invoked when the supervisor stops this transport.
    pub fn with_shutdown<F, Fut, E>(mut self, shutdown: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Into<BoxError>,
    {
        self.shutdown = Some(Box::new(move || {
            shutdown().map(|res| res.map_err(Into::<BoxError>::into)).boxed()
        }));
        self
    }

    pub(crate) fn start(&mut self, name: &str) -> CompletionSignal {
        let Some(run) = self.run.take() else {
            return CompletionSignal::ready(Err(TransportError::AlreadyStarted));
        };
        self.started = true;

        let name = name.to_string();
        let (completion, signal) = CompletionSignal::channel();
        tokio::spawn(async move {
            tracing::info!(transport = %name, "Custom transport running");
            let result = run().await.map_err(TransportError::Custom);
            tracing::info!(transport = %name, ok = result.is_ok(), "Custom transport returned");
            completion.complete(result);
        });
        signal
    }

    pub(crate) async fn stop(&mut self) -> Result<(), TransportError> {
        if !self.started {
            return Ok(());
        }
        match self.shutdown.take() {
            Some(shutdown) => shutdown().await.map_err(TransportError::Shutdown),
            None => Ok(()),
        }
    }
}
