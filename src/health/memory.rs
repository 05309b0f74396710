//! In-memory sample store.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::health::store::{
    Authorization, HealthStore, SampleQuery, SortOrder, StatisticsQuery, StoreError,
};
use crate::health::types::{MetricKind, Quantity, QuantitySample, Unit};

/// Holds samples and the set of kinds the user allowed to be read.
pub struct SampleStore {
    samples: RwLock<Vec<QuantitySample>>,
    authorized: RwLock<HashSet<MetricKind>>,
    grant_access: bool,
}

impl SampleStore {
    /// Create an empty store. `grant_access` is the answer the consent prompt gives.
    pub fn new(grant_access: bool) -> Self {
        Self {
            samples: RwLock::new(Vec::new()),
            authorized: RwLock::new(HashSet::new()),
            grant_access,
        }
    }

    /// Create a store whose kinds are already authorized.
    pub fn authorized(samples: Vec<QuantitySample>) -> Self {
        Self {
            samples: RwLock::new(samples),
            authorized: RwLock::new(MetricKind::ALL.into_iter().collect()),
            grant_access: true,
        }
    }

    /// Add one sample.
    pub async fn insert(&self, sample: QuantitySample) {
        self.samples.write().await.push(sample);
    }

    /// Swap the whole sample set.
    pub async fn replace(&self, samples: Vec<QuantitySample>) {
        *self.samples.write().await = samples;
    }

    /// Whether read access to `kind` has been granted.
    pub async fn is_authorized(&self, kind: MetricKind) -> bool {
        self.authorized.read().await.contains(&kind)
    }

    pub(crate) async fn ensure_authorized(&self, kind: MetricKind) -> Result<(), StoreError> {
        if self.is_authorized(kind).await {
            Ok(())
        } else {
            Err(StoreError::NotAuthorized(kind))
        }
    }
}

/// Evaluate a sample query against a slice of samples.
pub(crate) fn run_sample_query(samples: &[QuantitySample], query: &SampleQuery) -> Vec<QuantitySample> {
    let mut matched: Vec<QuantitySample> = samples
        .iter()
        .filter(|s| s.kind == query.kind)
        .cloned()
        .collect();

    match query.sort {
        SortOrder::EndDateDescending => matched.sort_by(|a, b| b.end.cmp(&a.end)),
    }

    if let Some(limit) = query.limit {
        matched.truncate(limit);
    }
    matched
}

/// Sum the samples matching a statistics query, in `count`.
pub(crate) fn run_statistics_query(
    samples: &[QuantitySample],
    query: &StatisticsQuery,
) -> Result<Option<Quantity>, StoreError> {
    let mut total: Option<f64> = None;
    for sample in samples.iter().filter(|s| query.matches(s)) {
        let value = sample.quantity.value_in(Unit::Count)?;
        total = Some(total.unwrap_or(0.0) + value);
    }
    Ok(total.map(|value| Quantity::new(value, Unit::Count)))
}

#[async_trait]
impl HealthStore for SampleStore {
    async fn samples(&self, query: SampleQuery) -> Result<Vec<QuantitySample>, StoreError> {
        self.ensure_authorized(query.kind).await?;
        let samples = self.samples.read().await;
        Ok(run_sample_query(&samples, &query))
    }

    async fn cumulative_sum(&self, query: StatisticsQuery) -> Result<Option<Quantity>, StoreError> {
        self.ensure_authorized(query.kind).await?;
        let samples = self.samples.read().await;
        run_statistics_query(&samples, &query)
    }
}

#[async_trait]
impl Authorization for SampleStore {
    async fn request_authorization(&self, read_types: &[MetricKind]) -> bool {
        if !self.grant_access {
            tracing::warn!(?read_types, "Read access declined");
            return false;
        }
        self.authorized.write().await.extend(read_types.iter().copied());
        tracing::info!(?read_types, "Read access granted");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn sample(kind: MetricKind, value: f64, unit: Unit, minute: i64) -> QuantitySample {
        let base = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let start = base + Duration::minutes(minute);
        QuantitySample::new(kind, Quantity::new(value, unit), start, start + Duration::seconds(30))
    }

    #[tokio::test]
    async fn test_most_recent_orders_by_end_date() {
        let store = SampleStore::authorized(vec![
            sample(MetricKind::HeartRate, 60.0, Unit::CountPerMinute, 0),
            sample(MetricKind::HeartRate, 75.0, Unit::CountPerMinute, 10),
            sample(MetricKind::HeartRate, 68.0, Unit::CountPerMinute, 5),
            sample(MetricKind::StepCount, 100.0, Unit::Count, 20),
        ]);

        let result = store.samples(SampleQuery::most_recent(MetricKind::HeartRate)).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].quantity.value, 75.0);
    }

    #[tokio::test]
    async fn test_sum_uses_strict_start() {
        let store = SampleStore::authorized(vec![
            sample(MetricKind::StepCount, 100.0, Unit::Count, -1),
            sample(MetricKind::StepCount, 200.0, Unit::Count, 0),
            sample(MetricKind::StepCount, 300.0, Unit::Count, 30),
            sample(MetricKind::StepCount, 400.0, Unit::Count, 60),
        ]);
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 8, 0, 0).unwrap();
        let query = StatisticsQuery {
            kind: MetricKind::StepCount,
            start,
            end: start + Duration::minutes(60),
        };

        let sum = store.cumulative_sum(query).await.unwrap().unwrap();
        assert_eq!(sum.value, 500.0);
        assert_eq!(sum.unit, Unit::Count);
    }

    #[tokio::test]
    async fn test_sum_without_samples_is_none() {
        let store = SampleStore::authorized(Vec::new());
        let start = Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap();
        let query = StatisticsQuery {
            kind: MetricKind::StepCount,
            start,
            end: start + Duration::hours(1),
        };
        assert!(store.cumulative_sum(query).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_queries_require_authorization() {
        let store = SampleStore::new(true);
        store.insert(sample(MetricKind::HeartRate, 70.0, Unit::CountPerMinute, 0)).await;

        let err = store.samples(SampleQuery::most_recent(MetricKind::HeartRate)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthorized(MetricKind::HeartRate)));

        assert!(store.request_authorization(&MetricKind::ALL).await);
        assert_eq!(store.samples(SampleQuery::most_recent(MetricKind::HeartRate)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_declined_consent_keeps_store_locked() {
        let store = SampleStore::new(false);
        assert!(!store.request_authorization(&MetricKind::ALL).await);
        assert!(!store.is_authorized(MetricKind::StepCount).await);
    }
}
