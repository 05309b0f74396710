//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms via the metrics facade)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Each cycle runs in a span carrying a UUID `cycle_id` and its trigger source
//! - Metric updates are no-ops until an exporter is installed
//! - Failures are logged where they are discriminated, then collapsed

pub mod logging;
pub mod metrics;
