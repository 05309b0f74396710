//! Health data types.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::store::StoreError;

/// The metrics the relay knows how to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    HeartRate,
    StepCount,
}

impl MetricKind {
    /// Every kind the relay reads, in a stable order.
    pub const ALL: [MetricKind; 2] = [MetricKind::HeartRate, MetricKind::StepCount];

    /// Label used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::HeartRate => "heart_rate",
            MetricKind::StepCount => "step_count",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units a quantity can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Unit {
    #[serde(rename = "count")]
    Count,
    #[serde(rename = "count/min")]
    CountPerMinute,
    #[serde(rename = "count/s")]
    CountPerSecond,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Unit::Count => "count",
            Unit::CountPerMinute => "count/min",
            Unit::CountPerSecond => "count/s",
        };
        f.write_str(s)
    }
}

/// A scalar value tagged with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Express this quantity in `target`.
    ///
    /// Rates convert between per-second and per-minute; a plain count never
    /// converts to a rate or back.
    pub fn value_in(&self, target: Unit) -> Result<f64, StoreError> {
        match (self.unit, target) {
            (from, to) if from == to => Ok(self.value),
            (Unit::CountPerSecond, Unit::CountPerMinute) => Ok(self.value * 60.0),
            (Unit::CountPerMinute, Unit::CountPerSecond) => Ok(self.value / 60.0),
            (from, to) => Err(StoreError::IncompatibleUnit { from, to }),
        }
    }
}

/// One recorded sample from the data source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantitySample {
    pub kind: MetricKind,
    pub quantity: Quantity,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl QuantitySample {
    pub fn new(kind: MetricKind, quantity: Quantity, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { kind, quantity, start, end }
    }
}

/// A single sampled or aggregated value produced by a reader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricReading {
    pub kind: MetricKind,
    pub value: f64,
}
