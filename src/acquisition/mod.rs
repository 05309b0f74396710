//! Metric acquisition.
//!
//! # Data Flow
//! ```text
//! AcquisitionCoordinator::acquire()
//!     ├─▶ HeartRateReader::read()  (most recent sample, count/min)
//!     └─▶ StepCountReader::read()  (sum over [start of today, now))
//!             both polled concurrently, neither cancelled on the other's failure
//!     → join: both Ok → JoinedSample
//!             any Err → AcquisitionError::PartialFailure
//! ```
//!
//! # Design Decisions
//! - Readers only report success or `NoSampleAvailable`; store detail is logged
//!   where it happens and dropped
//! - A `JoinedSample` cannot exist half-populated
//! - No internal timeout: the caller's deadline is the only bound

pub mod coordinator;
pub mod reader;

pub use coordinator::{Acquisition, AcquisitionCoordinator, AcquisitionError, JoinedSample};
pub use reader::{HeartRateReader, MetricReader, ReadError, StepCountReader};
