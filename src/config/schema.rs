//! Configuration schema definitions.
//!
//! Covers everything about the supervisor that can be expressed as data.
//! Transport registrations carry server instances and are made in code
//! through `SupervisorBuilder`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration for the supervisor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SupervisorConfig {
    /// Administrative endpoint (`/healthz`, `/metrics`).
    pub admin: AdminConfig,

    /// Health aggregator settings.
    pub health: HealthConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Administrative endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Bind address; `:PORT` binds all interfaces.
    pub bind_address: String,

    /// Log path and method of every admin request.
    pub log_requests: bool,

    /// Resource-protection timeouts.
    pub timeouts: AdminTimeouts,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            bind_address: ":8001".to_string(),
            log_requests: false,
            timeouts: AdminTimeouts::default(),
        }
    }
}

/// Timeouts applied to the administrative endpoint only.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdminTimeouts {
    /// Time allowed to read a request body, in seconds.
    pub read_secs: u64,

    /// Time allowed to read request headers, in seconds.
    pub read_header_secs: u64,

    /// Time allowed to produce and write the response, in seconds.
    pub write_secs: u64,

    /// Time a connection may stay silent before it is closed, in seconds.
    pub idle_secs: u64,
}

impl AdminTimeouts {
    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_secs)
    }

    pub fn read_header(&self) -> Duration {
        Duration::from_secs(self.read_header_secs)
    }

    pub fn write(&self) -> Duration {
        Duration::from_secs(self.write_secs)
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }
}

impl Default for AdminTimeouts {
    fn default() -> Self {
        Self {
            read_secs: 30,
            read_header_secs: 5,
            write_secs: 30,
            idle_secs: 300,
        }
    }
}

/// Health aggregator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Static key/value pairs reported by `/healthz`.
    pub metadata: BTreeMap<String, String>,

    /// Per-component check timeout in seconds.
    pub check_timeout_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            metadata: BTreeMap::new(),
            check_timeout_secs: 5,
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Upper bound for each survivor's stop, in seconds. Unset waits forever.
    pub stop_timeout_secs: Option<u64>,
}

impl ShutdownConfig {
    pub fn stop_timeout(&self) -> Option<Duration> {
        self.stop_timeout_secs.map(Duration::from_secs)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive, overridden by `RUST_LOG`.
    pub log_level: String,

    /// Output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
