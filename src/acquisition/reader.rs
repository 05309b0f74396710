//! Single-metric readers.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveTime, TimeZone, Utc};
use thiserror::Error;

use crate::health::{HealthStore, MetricKind, MetricReading, SampleQuery, StatisticsQuery, Unit};
use crate::observability::metrics;

/// Errors a reader can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadError {
    /// The source had nothing to report, refused access, or failed.
    #[error("no {0} sample available")]
    NoSampleAvailable(MetricKind),
}

impl ReadError {
    /// The metric that failed.
    pub fn kind(&self) -> MetricKind {
        match self {
            ReadError::NoSampleAvailable(kind) => *kind,
        }
    }
}

/// Reads one scalar value for one metric kind.
#[async_trait]
pub trait MetricReader: Send + Sync {
    /// The metric this reader produces.
    fn kind(&self) -> MetricKind;

    /// Query the source once.
    async fn read(&self) -> Result<f64, ReadError>;

    /// Query the source once and tag the value with its kind.
    async fn reading(&self) -> Result<MetricReading, ReadError> {
        let value = self.read().await?;
        Ok(MetricReading { kind: self.kind(), value })
    }
}

fn unavailable(kind: MetricKind, reason: &dyn std::fmt::Display) -> ReadError {
    tracing::warn!(metric = %kind, reason = %reason, "Failed to read metric");
    metrics::record_read_failure(kind);
    ReadError::NoSampleAvailable(kind)
}

/// Most recent heart-rate sample, in beats per minute.
pub struct HeartRateReader {
    store: Arc<dyn HealthStore>,
}

impl HeartRateReader {
    /// Read from `store`.
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MetricReader for HeartRateReader {
    fn kind(&self) -> MetricKind {
        MetricKind::HeartRate
    }

    async fn read(&self) -> Result<f64, ReadError> {
        let kind = self.kind();
        let samples = self
            .store
            .samples(SampleQuery::most_recent(kind))
            .await
            .map_err(|e| unavailable(kind, &e))?;

        let latest = samples
            .first()
            .ok_or_else(|| unavailable(kind, &"no samples recorded"))?;

        let bpm = latest
            .quantity
            .value_in(Unit::CountPerMinute)
            .map_err(|e| unavailable(kind, &e))?;

        tracing::debug!(bpm, end = %latest.end, "Most recent heart rate");
        Ok(bpm)
    }
}

/// Step count summed over the current local calendar day.
pub struct StepCountReader {
    store: Arc<dyn HealthStore>,
    clock: fn() -> DateTime<Local>,
}

impl StepCountReader {
    /// Read from `store`, with "today" taken from the system clock.
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self::with_clock(store, Local::now)
    }

    /// Use `clock` instead of the system clock to decide what "today" is.
    pub fn with_clock(store: Arc<dyn HealthStore>, clock: fn() -> DateTime<Local>) -> Self {
        Self { store, clock }
    }
}

/// Midnight at the start of the calendar day containing `now`, in `now`'s zone.
///
/// Falls back to subtracting the elapsed wall-clock time when local midnight
/// does not exist (a DST jump at 00:00).
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Tz> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    midnight
        .and_local_timezone(now.timezone())
        .earliest()
        .unwrap_or_else(|| now.clone() - (now.naive_local() - midnight))
}

/// Step-count statistics query for `[start of day, now)`.
pub fn today_query<Tz: TimeZone>(now: &DateTime<Tz>) -> StatisticsQuery {
    StatisticsQuery {
        kind: MetricKind::StepCount,
        start: start_of_day(now).with_timezone(&Utc),
        end: now.with_timezone(&Utc),
    }
}

#[async_trait]
impl MetricReader for StepCountReader {
    fn kind(&self) -> MetricKind {
        MetricKind::StepCount
    }

    async fn read(&self) -> Result<f64, ReadError> {
        let kind = self.kind();
        let query = today_query(&(self.clock)());
        let since = query.start;

        let sum = self
            .store
            .cumulative_sum(query)
            .await
            .map_err(|e| unavailable(kind, &e))?
            .ok_or_else(|| unavailable(kind, &"no aggregable data"))?;

        let steps = sum.value_in(Unit::Count).map_err(|e| unavailable(kind, &e))?;
        tracing::debug!(steps, since = %since, "Total steps today");
        Ok(steps)
    }
}
