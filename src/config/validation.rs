//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check the log filter parses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - The admin address is NOT resolved here; an unbindable address is a
//!   runtime bind failure of the admin transport

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::schema::SupervisorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SupervisorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.admin.bind_address.trim().is_empty() {
        errors.push(ValidationError::new("admin.bind_address", "must not be empty"));
    }

    let timeouts = &config.admin.timeouts;
    for (field, value) in [
        ("admin.timeouts.read_secs", timeouts.read_secs),
        ("admin.timeouts.read_header_secs", timeouts.read_header_secs),
        ("admin.timeouts.write_secs", timeouts.write_secs),
        ("admin.timeouts.idle_secs", timeouts.idle_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.health.check_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "health.check_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.shutdown.stop_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "shutdown.stop_timeout_secs",
            "must be greater than zero when set",
        ));
    }

    if let Err(e) = EnvFilter::try_new(&config.observability.log_level) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("invalid filter: {}", e),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&SupervisorConfig::default()).is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let mut config = SupervisorConfig::default();
        config.admin.bind_address = "  ".to_string();
        config.admin.timeouts.idle_secs = 0;
        config.shutdown.stop_timeout_secs = Some(0);

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "admin.bind_address",
                "admin.timeouts.idle_secs",
                "shutdown.stop_timeout_secs"
            ]
        );
    }
}
