//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the health relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayAppConfig {
    /// Outbound relay settings.
    pub relay: RelayConfig,

    /// Health data source settings.
    pub source: SourceConfig,

    /// Background scheduling settings.
    pub scheduler: SchedulerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Relay endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Destination URL for joined samples.
    pub endpoint: String,

    /// Client-side request timeout in seconds. 0 disables it, leaving the
    /// grant window as the only bound.
    pub timeout_secs: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/updateAppleHealthData".to_string(),
            timeout_secs: 0,
        }
    }
}

/// Health data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Path to the JSON sample export.
    pub path: String,

    /// Answer given when read access is requested.
    pub grant_access: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: "health-export.json".to_string(),
            grant_access: true,
        }
    }
}

/// Background scheduling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Identifier the background task is registered under.
    pub task_id: String,

    /// Minimum time between two launches of the task, in seconds.
    pub min_interval_secs: u64,

    /// Lifetime of each background grant, in seconds.
    pub grant_window_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            task_id: "health-relay.fetchHealthData".to_string(),
            min_interval_secs: 900,
            grant_window_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
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
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: RelayAppConfig = toml::from_str("").unwrap();
        assert_eq!(config.relay.endpoint, "http://localhost:3000/api/updateAppleHealthData");
        assert_eq!(config.scheduler.grant_window_secs, 30);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_sections() {
        let config: RelayAppConfig = toml::from_str(
            r#"
            [relay]
            endpoint = "https://dash.example.com/api/health"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.relay.endpoint, "https://dash.example.com/api/health");
        assert_eq!(config.relay.timeout_secs, 0);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.source.path, "health-export.json");
    }
}
