//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → /metrics on the admin endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
