//! Health store backed by a JSON sample export on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::health::memory::{run_sample_query, run_statistics_query, SampleStore};
use crate::health::store::{Authorization, HealthStore, SampleQuery, StatisticsQuery, StoreError};
use crate::health::types::{MetricKind, Quantity, QuantitySample};

/// Reads a JSON array of [`QuantitySample`]s. The file is re-read on every query
/// so an exporter can keep appending to it while the relay runs.
pub struct FileStore {
    path: PathBuf,
    consent: SampleStore,
}

impl FileStore {
    /// Store over the export at `path`. Consent is handled as in [`SampleStore::new`].
    pub fn new(path: impl Into<PathBuf>, grant_access: bool) -> Self {
        Self {
            path: path.into(),
            consent: SampleStore::new(grant_access),
        }
    }

    /// Location of the export.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Vec<QuantitySample>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let samples: Vec<QuantitySample> = serde_json::from_str(&content)?;
        tracing::debug!(path = ?self.path, count = samples.len(), "Loaded sample export");
        Ok(samples)
    }
}

#[async_trait]
impl HealthStore for FileStore {
    async fn samples(&self, query: SampleQuery) -> Result<Vec<QuantitySample>, StoreError> {
        self.consent.ensure_authorized(query.kind).await?;
        let samples = self.load().await?;
        Ok(run_sample_query(&samples, &query))
    }

    async fn cumulative_sum(&self, query: StatisticsQuery) -> Result<Option<Quantity>, StoreError> {
        self.consent.ensure_authorized(query.kind).await?;
        let samples = self.load().await?;
        run_statistics_query(&samples, &query)
    }
}

#[async_trait]
impl Authorization for FileStore {
    async fn request_authorization(&self, read_types: &[MetricKind]) -> bool {
        self.consent.request_authorization(read_types).await
    }
}
