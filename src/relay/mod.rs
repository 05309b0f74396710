//! Outbound relay of joined samples.
//!
//! # Data Flow
//! ```text
//! JoinedSample
//!     → payload.rs (RelayPayload, {"heartRate": f64, "steps": f64})
//!     → client.rs (one POST, Content-Type: application/json)
//!     → 2xx with readable body → Ok(()) (body logged, not interpreted)
//!     → anything else → RelayError
//! ```
//!
//! # Design Decisions
//! - Exactly one attempt per cycle; a dropped reading is replaced by the next cycle
//! - No authentication, no idempotency key
//! - The endpoint is validated when the client is built, not per send

pub mod client;
pub mod payload;

pub use client::{HttpRelay, Relay, RelayError};
pub use payload::RelayPayload;
