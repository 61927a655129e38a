//! Health aggregation subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration:
//!     metadata (key/value) + components (name, check fn)
//!     → Healthz (shared via Arc with the admin endpoint)
//!
//! Supervisor:
//!     all transports launched → Healthz::started()
//!
//! GET /healthz:
//!     run every component check concurrently (bounded by check timeout)
//!     → HealthReport { status, metadata, components }
//! ```
//!
//! # Design Decisions
//! - "Started" means every transport launch was requested, not that every
//!   listener is bound
//! - Report is `starting` until started, `unhealthy` if any check fails
//! - Checks run on each request; no caching

pub mod aggregator;
pub mod component;

pub use aggregator::{HealthReport, HealthStatus, Healthz};
pub use component::{Component, ComponentReport};
