//! Configuration validation.
//!
//! Returns every semantic error at once rather than stopping at the first.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RelayAppConfig;
use crate::relay::client::parse_endpoint;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration.
pub fn validate_config(config: &RelayAppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = parse_endpoint(&config.relay.endpoint) {
        errors.push(ValidationError {
            field: "relay.endpoint",
            message: e.to_string(),
        });
    }

    if config.source.path.trim().is_empty() {
        errors.push(ValidationError {
            field: "source.path",
            message: "must not be empty".into(),
        });
    }

    if config.scheduler.task_id.trim().is_empty() {
        errors.push(ValidationError {
            field: "scheduler.task_id",
            message: "must not be empty".into(),
        });
    }

    if config.scheduler.grant_window_secs == 0 {
        errors.push(ValidationError {
            field: "scheduler.grant_window_secs",
            message: "must be greater than 0".into(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address",
            message: format!("'{}' is not a socket address", config.observability.metrics_address),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
