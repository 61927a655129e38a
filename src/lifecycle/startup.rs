//! Startup assembly.
//!
//! # Responsibilities
//! - Collect configuration, health components and transport registrations
//! - Validate everything before a `Supervisor` exists
//! - Wire the admin endpoint to the health aggregator and metrics handle
//!
//! # Design Decisions
//! - Fail fast: any configuration error is returned by `build()`, so `run`
//!   is unreachable with a bad setup
//! - The admin transport is appended last, after all registrations

use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use crate::admin::{AdminEndpoint, AdminTransport};
use crate::config::validation::validate_config;
use crate::config::{ConfigError, SupervisorConfig};
use crate::health::{Component, Healthz};
use crate::lifecycle::supervisor::Supervisor;
use crate::observability::metrics;
use crate::transport::{CustomTransport, TransportManager, ADMIN_TRANSPORT_NAME};

/// Assembles a [`Supervisor`].
///
/// ```no_run
/// use transport_supervisor::lifecycle::SupervisorBuilder;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let api = axum::Router::new();
/// let supervisor = SupervisorBuilder::new()
///     .with_admin_addr(":8001")
///     .add_healthz_metadata("service", "billing")
///     .with_http_server("api", "0.0.0.0:8080", api)
///     .build()?;
/// supervisor.run().await?;
/// # Ok(())
/// # }
/// ```
pub struct SupervisorBuilder {
    config: SupervisorConfig,
    components: Vec<Component>,
    transports: Vec<TransportManager>,
    stop_timeout: Option<Duration>,
    metrics: Option<PrometheusHandle>,
}

impl SupervisorBuilder {
    pub fn new() -> Self {
        Self::from_config(SupervisorConfig::default())
    }

    /// Start from a loaded configuration file.
    pub fn from_config(config: SupervisorConfig) -> Self {
        let stop_timeout = config.shutdown.stop_timeout();
        Self {
            config,
            components: Vec::new(),
            transports: Vec::new(),
            stop_timeout,
            metrics: None,
        }
    }

    /// Address of the internal `/healthz` + `/metrics` server.
    pub fn with_admin_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.admin.bind_address = addr.into();
        self
    }

    /// Log path and method of every admin request.
    pub fn with_admin_request_logging(mut self, enabled: bool) -> Self {
        self.config.admin.log_requests = enabled;
        self
    }

    pub fn with_healthz_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    pub fn add_healthz_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.health.metadata.insert(key.into(), value.into());
        self
    }

    /// Run a tonic server on `addr`.
    pub fn with_rpc_server(
        self,
        name: impl Into<String>,
        addr: impl Into<String>,
        routes: tonic::service::Routes,
    ) -> Self {
        self.with_transport(TransportManager::rpc(name, addr, routes))
    }

    /// Run an axum server on `addr`.
    pub fn with_http_server(
        self,
        name: impl Into<String>,
        addr: impl Into<String>,
        router: axum::Router,
    ) -> Self {
        self.with_transport(TransportManager::http(name, addr, router))
    }

    pub fn with_custom(self, name: impl Into<String>, transport: CustomTransport) -> Self {
        self.with_transport(TransportManager::custom(name, transport))
    }

    pub fn with_transport(mut self, transport: TransportManager) -> Self {
        self.transports.push(transport);
        self
    }

    /// Bound each survivor's stop during group shutdown.
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = Some(timeout);
        self
    }

    /// Use this handle for `/metrics` instead of installing the global
    /// Prometheus recorder.
    ///
    /// The `supervisor_*` counters go through the global `metrics` facade,
    /// so they only show up on `/metrics` when the handle's recorder is the
    /// installed one (as with [`metrics::install_recorder`]). A handle from
    /// [`metrics::detached_handle`] renders only what is recorded into its
    /// own recorder.
    pub fn with_metrics_handle(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    pub fn build(self) -> Result<Supervisor, ConfigError> {
        validate_config(&self.config).map_err(ConfigError::Validation)?;
        check_names(&self.transports)?;

        let metrics = match self.metrics {
            Some(handle) => handle,
            None => metrics::install_recorder().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Prometheus recorder unavailable, /metrics will be empty");
                metrics::detached_handle()
            }),
        };

        let health = Arc::new(
            Healthz::new(self.config.health.metadata.clone(), self.components)
                .with_check_timeout(Duration::from_secs(self.config.health.check_timeout_secs)),
        );

        let endpoint = AdminEndpoint::new(self.config.admin.clone(), health.clone(), metrics);
        let mut transports = self.transports;
        transports.push(TransportManager::admin(AdminTransport::new(&endpoint)));

        tracing::debug!(
            transports = transports.len(),
            admin_address = %self.config.admin.bind_address,
            "Supervisor assembled"
        );

        Ok(Supervisor::new(transports, health, self.stop_timeout))
    }
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_names(transports: &[TransportManager]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for transport in transports {
        let name = transport.name();
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyTransportName);
        }
        if name == ADMIN_TRANSPORT_NAME {
            return Err(ConfigError::ReservedTransportName(name.to_string()));
        }
        if !seen.insert(name) {
            return Err(ConfigError::DuplicateTransport(name.to_string()));
        }
    }
    Ok(())
}
