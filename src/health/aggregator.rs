//! Process health aggregation behind `/healthz`.

use futures_util::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::component::{Component, ComponentReport};

const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Overall process status.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Starting,
    Unhealthy,
}

/// Body returned by `/healthz`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub metadata: BTreeMap<String, String>,
    pub components: Vec<ComponentReport>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

/// Aggregates component checks and the started flag.
#[derive(Debug)]
pub struct Healthz {
    metadata: BTreeMap<String, String>,
    components: Vec<Component>,
    check_timeout: Duration,
    started: AtomicBool,
}

impl Healthz {
    pub fn new(metadata: BTreeMap<String, String>, components: Vec<Component>) -> Self {
        Self {
            metadata,
            components,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            started: AtomicBool::new(false),
        }
    }

    /// Bound each component check by `timeout`.
    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }

    /// Mark the process as started.
    pub fn started(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            tracing::info!(components = self.components.len(), "Health aggregator marked started");
        }
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Run all checks and build the report.
    pub async fn report(&self) -> HealthReport {
        let components = join_all(
            self.components
                .iter()
                .map(|component| component.probe(self.check_timeout)),
        )
        .await;

        let status = if !self.is_started() {
            HealthStatus::Starting
        } else if components.iter().all(|c| c.healthy) {
            HealthStatus::Ok
        } else {
            HealthStatus::Unhealthy
        };

        HealthReport {
            status,
            metadata: self.metadata.clone(),
            components,
        }
    }
}

impl Default for Healthz {
    fn default() -> Self {
        Self::new(BTreeMap::new(), Vec::new())
    }
}
