//! One acquire-then-relay attempt.

use std::fmt;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::acquisition::Acquisition;
use crate::observability::metrics;
use crate::relay::Relay;

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSource {
    Foreground,
    Background,
}

impl TriggerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerSource::Foreground => "foreground",
            TriggerSource::Background => "background",
        }
    }
}

impl fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The acquisition and relay pair a cycle runs against.
#[derive(Clone)]
pub struct Cycle {
    acquisition: Arc<dyn Acquisition>,
    relay: Arc<dyn Relay>,
}

impl Cycle {
    /// Cycle that relays what `acquisition` produces through `relay`.
    pub fn new(acquisition: Arc<dyn Acquisition>, relay: Arc<dyn Relay>) -> Self {
        Self { acquisition, relay }
    }

    /// Acquire a joined sample and relay it. Returns whether the relay succeeded.
    pub async fn run(&self, source: TriggerSource) -> bool {
        let cycle_id = Uuid::new_v4();
        let span = tracing::info_span!("cycle", %cycle_id, trigger = %source);
        let started = Instant::now();

        let success = async {
            let sample = match self.acquisition.acquire().await {
                Ok(sample) => sample,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping relay");
                    return false;
                }
            };

            match self.relay.send(sample).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "Cycle produced no relay");
                    false
                }
            }
        }
        .instrument(span)
        .await;

        metrics::record_cycle(source.as_str(), if success { "success" } else { "failure" }, started.elapsed());
        success
    }
}
