//! Fan-out/fan-in over the two metric readers.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::acquisition::reader::{MetricReader, ReadError};
use crate::health::MetricKind;

/// Heart rate and step count from one cycle. Only exists fully populated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JoinedSample {
    pub heart_rate: f64,
    pub steps: f64,
}

impl JoinedSample {
    /// Join two settled reads. Any failure rejects the whole sample.
    pub fn join(
        heart_rate: Result<f64, ReadError>,
        steps: Result<f64, ReadError>,
    ) -> Result<Self, AcquisitionError> {
        match (heart_rate, steps) {
            (Ok(heart_rate), Ok(steps)) => Ok(Self { heart_rate, steps }),
            (heart_rate, steps) => {
                let failed: Vec<MetricKind> = [heart_rate.err(), steps.err()]
                    .into_iter()
                    .flatten()
                    .map(|e| e.kind())
                    .collect();
                tracing::warn!(?failed, "Acquisition incomplete, discarding partial sample");
                Err(AcquisitionError::PartialFailure)
            }
        }
    }
}

/// Errors from an acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquisitionError {
    /// At least one reader failed; nothing is relayed.
    #[error("one or more metrics could not be read")]
    PartialFailure,
}

/// Produces one joined sample per call.
#[async_trait]
pub trait Acquisition: Send + Sync {
    async fn acquire(&self) -> Result<JoinedSample, AcquisitionError>;
}

/// Runs the heart-rate and step-count readers concurrently and joins them.
pub struct AcquisitionCoordinator {
    heart_rate: Arc<dyn MetricReader>,
    steps: Arc<dyn MetricReader>,
}

impl AcquisitionCoordinator {
    /// Join readings from `heart_rate` and `steps`.
    pub fn new(heart_rate: Arc<dyn MetricReader>, steps: Arc<dyn MetricReader>) -> Self {
        Self { heart_rate, steps }
    }
}

#[async_trait]
impl Acquisition for AcquisitionCoordinator {
    async fn acquire(&self) -> Result<JoinedSample, AcquisitionError> {
        // join! polls both to completion; a failure on one side never cancels the other.
        let (heart_rate, steps) = tokio::join!(self.heart_rate.reading(), self.steps.reading());
        for reading in [&heart_rate, &steps].into_iter().flatten() {
            tracing::debug!(metric = %reading.kind, value = reading.value, "Metric read");
        }
        let sample = JoinedSample::join(heart_rate.map(|r| r.value), steps.map(|r| r.value))?;

        tracing::info!(
            heart_rate = sample.heart_rate,
            steps = sample.steps,
            "Acquired joined sample"
        );
        Ok(sample)
    }
}
