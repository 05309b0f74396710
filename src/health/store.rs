//! Data-source and consent collaborator contracts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::health::types::{MetricKind, Quantity, QuantitySample, Unit};

/// Errors surfaced by a health data source.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The user has not granted read access to this metric.
    #[error("read access to {0} not authorized")]
    NotAuthorized(MetricKind),

    /// The backing export could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing export is not a valid sample list.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A quantity was requested in a unit it cannot be converted to.
    #[error("cannot convert {from} to {to}")]
    IncompatibleUnit { from: Unit, to: Unit },
}

/// Sort order for sample queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest end date first.
    #[default]
    EndDateDescending,
}

/// Query for individual samples of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleQuery {
    pub kind: MetricKind,
    pub sort: SortOrder,
    /// Maximum number of samples returned; `None` returns all.
    pub limit: Option<usize>,
}

impl SampleQuery {
    /// The single most recent sample of `kind`.
    pub fn most_recent(kind: MetricKind) -> Self {
        Self {
            kind,
            sort: SortOrder::EndDateDescending,
            limit: Some(1),
        }
    }
}

/// Cumulative-sum query over a half-open interval.
///
/// A sample matches when `start <= sample.start < end`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsQuery {
    pub kind: MetricKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl StatisticsQuery {
    /// Whether `sample` falls in this query (kind and strict-start window).
    pub fn matches(&self, sample: &QuantitySample) -> bool {
        sample.kind == self.kind && sample.start >= self.start && sample.start < self.end
    }
}

/// A device-local source of health samples.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Run a sample query.
    async fn samples(&self, query: SampleQuery) -> Result<Vec<QuantitySample>, StoreError>;

    /// Cumulative sum of the matching samples, `None` when nothing matched.
    async fn cumulative_sum(&self, query: StatisticsQuery) -> Result<Option<Quantity>, StoreError>;
}

/// The consent prompt collaborator.
#[async_trait]
pub trait Authorization: Send + Sync {
    /// Ask for read access to `read_types`. Returns whether access was granted.
    async fn request_authorization(&self, read_types: &[MetricKind]) -> bool;
}
