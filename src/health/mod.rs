//! Device-local health data source.
//!
//! # Data Flow
//! ```text
//! Exporter (another process) writes samples
//!     → file.rs (FileStore re-reads the JSON export per query)
//!     → memory.rs (SampleStore evaluates sample/statistics queries)
//!     → acquisition readers consume the HealthStore trait
//!
//! Consent:
//!     Presenter → Authorization::request_authorization(read types)
//!     → store records the granted kinds
//!     → queries for ungranted kinds fail with NotAuthorized
//! ```
//!
//! # Design Decisions
//! - Queries mirror the two shapes the readers need: latest-N samples and a
//!   cumulative sum over an interval
//! - Units travel with quantities; conversion happens at the reader
//! - Stores are read-only from the relay's point of view

pub mod file;
pub mod memory;
pub mod store;
pub mod types;

pub use file::FileStore;
pub use memory::SampleStore;
pub use store::{Authorization, HealthStore, SampleQuery, SortOrder, StatisticsQuery, StoreError};
pub use types::{MetricKind, MetricReading, Quantity, QuantitySample, Unit};
