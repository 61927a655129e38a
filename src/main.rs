//! Transport supervisor (v1)
//!
//! Runs the administrative endpoint and a signal watcher under the
//! supervisor. Embedding applications register their own transports through
//! `SupervisorBuilder`; this binary is the minimal deployment of the admin
//! surface.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                         SUPERVISOR                           │
//!   │                                                              │
//!   │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐   │
//!   │   │   rpc    │  │   http   │  │  custom  │  │   admin    │   │
//!   │   │ (tonic)  │  │  (axum)  │  │ run/stop │  │ /healthz   │   │
//!   │   │          │  │          │  │          │  │ /metrics   │   │
//!   │   └────┬─────┘  └────┬─────┘  └────┬─────┘  └─────┬──────┘   │
//!   │        │ signal      │ signal      │ signal       │ signal   │
//!   │        └─────────────┴──────┬──────┴──────────────┘          │
//!   │                             ▼                                │
//!   │                  first completion wins                       │
//!   │                             │                                │
//!   │                             ▼                                │
//!   │              stop survivors in order → result                │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use transport_supervisor::config::{load_config, SupervisorConfig};
use transport_supervisor::lifecycle::signals::signal_transport;
use transport_supervisor::observability::{logging, metrics};
use transport_supervisor::SupervisorBuilder;

#[derive(Parser)]
#[command(name = "transport-supervisor")]
#[command(about = "Supervise network transports with a health and metrics endpoint", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the admin bind address (e.g. ":8001").
    #[arg(long)]
    admin_addr: Option<String>,

    /// Log every admin request.
    #[arg(long)]
    log_requests: bool,

    /// Bound each transport's stop, in seconds.
    #[arg(long)]
    stop_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SupervisorConfig::default(),
    };
    if let Some(addr) = cli.admin_addr {
        config.admin.bind_address = addr;
    }
    if cli.log_requests {
        config.admin.log_requests = true;
    }

    logging::init(&config.observability)?;
    tracing::info!("transport-supervisor v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        admin_address = %config.admin.bind_address,
        log_requests = config.admin.log_requests,
        "Configuration loaded"
    );

    let metrics_handle = metrics::install_recorder()?;

    let mut builder = SupervisorBuilder::from_config(config)
        .with_metrics_handle(metrics_handle)
        .add_healthz_metadata("version", env!("CARGO_PKG_VERSION"))
        .with_custom("signals", signal_transport());
    if let Some(secs) = cli.stop_timeout_secs {
        builder = builder.with_stop_timeout(Duration::from_secs(secs));
    }

    let supervisor = builder.build()?;
    supervisor.run().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
