//! Background execution scheduling.
//!
//! # Data Flow
//! ```text
//! startup:  register(task_id, handler) → submit(RefreshRequest)
//!
//! host.rs contracts, local.rs host:
//!     pending request becomes due
//!     → BackgroundGrant created (Armed, deadline = now + window)
//!     → GrantHandler::handle(grant)
//!         → handler re-submits, begins (Running), works
//!         → grant.complete(success) (Completed)
//!     → host observes the completion signal
//! ```
//!
//! # Grant States
//! ```text
//! Armed → Running → Completed
//! ```
//! A grant never returns to Armed. A fresh grant comes from a fresh request.
//!
//! # Design Decisions
//! - `complete` consumes the grant, so a grant signals at most once
//! - A grant dropped without completing is observed by the host as a failure
//! - The host can revoke every outstanding grant at once (shutdown)

pub mod grant;
pub mod host;
pub mod local;

pub use grant::{BackgroundGrant, GrantState};
pub use host::{BackgroundScheduler, GrantHandler, RefreshRequest, ScheduleError};
pub use local::{GrantOutcome, LocalScheduler};
