//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayAppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Parse a TOML configuration without validating it.
pub fn parse_config(path: &Path) -> Result<RelayAppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Parse a TOML configuration, let `adjust` apply overrides, then validate.
pub fn load_config(
    path: Option<&Path>,
    adjust: impl FnOnce(&mut RelayAppConfig),
) -> Result<RelayAppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(path)?,
        None => RelayAppConfig::default(),
    };
    adjust(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
