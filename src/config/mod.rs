//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SupervisorConfig (validated, immutable)
//!     → SupervisorBuilder (plus transports registered in code)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the supervisor runs
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, AdminTimeouts, HealthConfig, LogFormat, ObservabilityConfig, ShutdownConfig,
    SupervisorConfig,
};
pub use validation::ValidationError;
