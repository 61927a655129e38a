//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config + registrations → validate → Supervisor (admin appended last)
//!
//! Run (supervisor.rs):
//!     start all → Healthz::started → first completion → stop survivors
//!     → one terminal result
//!
//! Shutdown (shutdown.rs):
//!     watch-based trigger consumed by each serve loop
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → custom transport completes → group shuts down
//! ```
//!
//! # Design Decisions
//! - All-or-nothing group: any completion, clean or not, ends the group
//! - Survivors stop sequentially in registration order
//! - No stop deadline unless one is configured

pub mod shutdown;
pub mod signals;
pub mod startup;
pub mod supervisor;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use startup::SupervisorBuilder;
pub use supervisor::{RunHandle, StopFailure, Supervisor, SupervisorError};
