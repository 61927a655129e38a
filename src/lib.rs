//! Lifecycle supervisor for heterogeneous network transports.
//!
//! Registers RPC (tonic), request/response (axum) and custom serving loops,
//! runs them alongside a fixed `/healthz` + `/metrics` endpoint, and tears
//! the whole group down as soon as any one of them finishes.

pub mod admin;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod transport;

pub use config::schema::SupervisorConfig;
pub use lifecycle::{RunHandle, Supervisor, SupervisorBuilder, SupervisorError};
pub use transport::{CustomTransport, TransportError, TransportManager};
