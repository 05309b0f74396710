//! HTTP relay client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use thiserror::Error;
use url::Url;

use crate::acquisition::JoinedSample;
use crate::config::RelayConfig;
use crate::observability::metrics;
use crate::relay::payload::RelayPayload;

/// Errors that can occur while relaying a sample.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The destination address is unusable. Raised at construction time.
    #[error("invalid relay endpoint: {0}")]
    Configuration(String),

    /// The sample could not be serialized.
    #[error("failed to encode payload: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered, but not with a readable success.
    #[error("endpoint responded {status}: {reason}")]
    Response { status: u16, reason: String },
}

impl RelayError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::Configuration(_) => "configuration",
            RelayError::Encoding(_) => "encoding",
            RelayError::Transport(_) => "transport",
            RelayError::Response { .. } => "response",
        }
    }
}

/// Delivers a joined sample somewhere.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn send(&self, sample: JoinedSample) -> Result<(), RelayError>;
}

/// Posts samples as JSON to a fixed endpoint.
#[derive(Clone)]
pub struct HttpRelay {
    client: Client,
    endpoint: Url,
}

/// Parse and check a relay endpoint.
pub fn parse_endpoint(raw: &str) -> Result<Url, RelayError> {
    let url = Url::parse(raw).map_err(|e| RelayError::Configuration(format!("'{}': {}", raw, e)))?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(RelayError::Configuration(format!(
                "'{}': unsupported scheme '{}'",
                raw, other
            )))
        }
    }
    if url.host_str().is_none() {
        return Err(RelayError::Configuration(format!("'{}': missing host", raw)));
    }
    Ok(url)
}

impl HttpRelay {
    /// Build a relay for the configured endpoint.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let endpoint = parse_endpoint(&config.endpoint)?;

        let mut builder = Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let client = builder
            .build()
            .map_err(|e| RelayError::Configuration(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    /// The validated endpoint every sample is posted to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, sample: JoinedSample) -> Result<(), RelayError> {
        let body = RelayPayload::from(sample).to_json()?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(|e| RelayError::Response {
            status: status.as_u16(),
            reason: format!("unreadable body: {}", e),
        })?;

        if !status.is_success() {
            return Err(RelayError::Response {
                status: status.as_u16(),
                reason: text,
            });
        }

        tracing::info!(status = %status, response = %text, "Relay accepted sample");
        Ok(())
    }
}

#[async_trait]
impl Relay for HttpRelay {
    async fn send(&self, sample: JoinedSample) -> Result<(), RelayError> {
        let result = self.post(sample).await;
        if let Err(e) = &result {
            tracing::warn!(endpoint = %self.endpoint, error = %e, "Failed to relay sample");
            metrics::record_relay_failure(e.kind());
        }
        result
    }
}
