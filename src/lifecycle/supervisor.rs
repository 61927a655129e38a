//! Supervisor: start every transport, wait for the first to finish, stop
//! the rest, report one result.
//!
//! ```text
//! start(0..N-1), start(admin=N)  → N+1 CompletionSignals
//! Healthz::started()
//! select_all(signals)            → (died, outcome)   lowest index wins ties
//! stop(i) for i != died, ascending, optionally bounded by stop_timeout
//! → Ok(()) | SupervisorError
//! ```

use futures_util::future::select_all;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::health::Healthz;
use crate::observability::metrics;
use crate::transport::{Completion, CompletionSignal, TransportError, TransportManager};

/// A survivor whose `stop` failed while the group was shutting down.
#[derive(Debug)]
pub struct StopFailure {
    pub transport: String,
    pub error: TransportError,
}

impl fmt::Display for StopFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.transport, self.error)
    }
}

fn join_failures(failures: &[StopFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Terminal error of a supervised group.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A transport terminated with an error. Any survivors that failed to
    /// stop are attached.
    #[error("transport `{transport}` terminated: {source}")]
    Transport {
        transport: String,
        #[source]
        source: TransportError,
        stop_failures: Vec<StopFailure>,
    },

    /// A transport exited cleanly but some survivors failed to stop.
    #[error("transport `{transport}` exited; {} survivor(s) failed to stop: {}", .stop_failures.len(), join_failures(.stop_failures))]
    Stop {
        transport: String,
        stop_failures: Vec<StopFailure>,
    },

    /// The supervising task panicked or was cancelled.
    #[error("supervisor task ended without a result")]
    Aborted,
}

impl SupervisorError {
    /// Name of the transport whose completion ended the group.
    pub fn transport(&self) -> Option<&str> {
        match self {
            SupervisorError::Transport { transport, .. } | SupervisorError::Stop { transport, .. } => {
                Some(transport.as_str())
            }
            SupervisorError::Aborted => None,
        }
    }

    /// Secondary failures collected while stopping the survivors.
    pub fn stop_failures(&self) -> &[StopFailure] {
        match self {
            SupervisorError::Transport { stop_failures, .. }
            | SupervisorError::Stop { stop_failures, .. } => stop_failures.as_slice(),
            SupervisorError::Aborted => &[],
        }
    }
}

/// Owns the transports and runs them as one all-or-nothing group.
///
/// Built with [`SupervisorBuilder`](crate::lifecycle::SupervisorBuilder).
/// The administrative transport is always the last entry.
pub struct Supervisor {
    transports: Vec<TransportManager>,
    health: Arc<Healthz>,
    stop_timeout: Option<Duration>,
}

impl Supervisor {
    pub(crate) fn new(
        transports: Vec<TransportManager>,
        health: Arc<Healthz>,
        stop_timeout: Option<Duration>,
    ) -> Self {
        Self {
            transports,
            health,
            stop_timeout,
        }
    }

    /// Names in registration order; the admin transport comes last.
    pub fn transport_names(&self) -> Vec<&str> {
        self.transports.iter().map(TransportManager::name).collect()
    }

    pub fn health(&self) -> &Arc<Healthz> {
        &self.health
    }

    /// Run the group to completion on the current task.
    pub async fn run(mut self) -> Result<(), SupervisorError> {
        tracing::info!(
            transports = self.transports.len(),
            stop_timeout = ?self.stop_timeout,
            "Supervisor starting"
        );

        let signals: Vec<CompletionSignal> = self
            .transports
            .iter_mut()
            .map(|transport| {
                metrics::record_transport_start(transport.name(), transport.kind());
                transport.start()
            })
            .collect();

        // Launch requested for every transport; binds may still be pending.
        self.health.started();

        let (died, outcome) = first_completion(signals).await;
        let transport = self.transports[died].name().to_string();

        match &outcome {
            Ok(()) => {
                tracing::warn!(transport = %transport, "Transport exited, shutting down group");
                metrics::record_transport_exit(&transport, "clean");
            }
            Err(e) => {
                tracing::error!(transport = %transport, error = %e, "Transport failed, shutting down group");
                metrics::record_transport_exit(&transport, "error");
            }
        }

        let stop_failures = self.stop_survivors(died).await;

        tracing::info!(
            transport = %transport,
            stop_failures = stop_failures.len(),
            "Supervisor stopped"
        );

        match outcome {
            Err(source) => Err(SupervisorError::Transport {
                transport,
                source,
                stop_failures,
            }),
            Ok(()) if !stop_failures.is_empty() => Err(SupervisorError::Stop {
                transport,
                stop_failures,
            }),
            Ok(()) => Ok(()),
        }
    }

    /// Run the group on a background task.
    pub fn spawn(self) -> RunHandle {
        RunHandle {
            inner: tokio::spawn(self.run()),
        }
    }

    /// Stop every transport except `died`, in registration order.
    async fn stop_survivors(&mut self, died: usize) -> Vec<StopFailure> {
        let stop_timeout = self.stop_timeout;
        let mut failures = Vec::new();

        for (index, transport) in self.transports.iter_mut().enumerate() {
            if index == died {
                continue;
            }

            let result = match stop_timeout {
                Some(limit) => tokio::time::timeout(limit, transport.stop())
                    .await
                    .unwrap_or_else(|_| Err(TransportError::StopTimeout(limit))),
                None => transport.stop().await,
            };

            if let Err(error) = result {
                tracing::error!(transport = %transport.name(), error = %error, "Transport failed to stop");
                metrics::record_stop_failure(transport.name());
                failures.push(StopFailure {
                    transport: transport.name().to_string(),
                    error,
                });
            }
        }

        failures
    }
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("transports", &self.transports)
            .field("stop_timeout", &self.stop_timeout)
            .finish()
    }
}

/// Wait for the first signal to resolve.
///
/// Signals that are ready in the same pass resolve in index order, so the
/// lowest index wins. `signals` must not be empty.
pub(crate) async fn first_completion(signals: Vec<CompletionSignal>) -> (usize, Completion) {
    let (outcome, index, _pending) = select_all(signals).await;
    (index, outcome)
}

/// Result slot of a spawned supervisor. Resolves exactly once.
#[derive(Debug)]
pub struct RunHandle {
    inner: JoinHandle<Result<(), SupervisorError>>,
}

impl RunHandle {
    pub fn is_finished(&self) -> bool {
        self.inner.is_finished()
    }
}

impl Future for RunHandle {
    type Output = Result<(), SupervisorError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "Supervisor task aborted");
                Err(SupervisorError::Aborted)
            }
        })
    }
}
