//! One-shot completion conduit from a transport to the supervisor.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use super::TransportError;

/// Terminal outcome of a transport's serve loop.
pub type Completion = Result<(), TransportError>;

/// Yields the terminal result of a started transport exactly once.
///
/// If the serving task goes away without reporting (e.g. it panicked) the
/// signal resolves to [`TransportError::Abandoned`].
#[derive(Debug)]
pub struct CompletionSignal {
    rx: oneshot::Receiver<Completion>,
}

/// Sending half of a [`CompletionSignal`], owned by the serving task.
#[derive(Debug)]
pub struct CompletionSender {
    tx: oneshot::Sender<Completion>,
}

impl CompletionSignal {
    /// Create a connected sender/signal pair.
    pub fn channel() -> (CompletionSender, CompletionSignal) {
        let (tx, rx) = oneshot::channel();
        (CompletionSender { tx }, CompletionSignal { rx })
    }

    /// A signal that is already resolved with `result`.
    pub fn ready(result: Completion) -> Self {
        let (tx, signal) = Self::channel();
        tx.complete(result);
        signal
    }
}

impl CompletionSender {
    /// Deliver the terminal result. The receiver may already be gone once
    /// the group is shutting down, in which case the value is discarded.
    pub fn complete(self, result: Completion) {
        let _ = self.tx.send(result);
    }
}

impl Future for CompletionSignal {
    type Output = Completion;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or(Err(TransportError::Abandoned)))
    }
}
