//! Cycle triggers.
//!
//! # Data Flow
//! ```text
//! Presenter::on_visible()
//!     → Authorization::request_authorization
//!     → CycleTrigger::foreground()        (spawned, result only logged)
//!
//! LocalScheduler issues BackgroundGrant
//!     → CycleTrigger::handle(grant)
//!         1. submit next RefreshRequest  (re-arm, always first)
//!         2. Cycle::run                  (bounded by grant expiry)
//!         3. grant.complete(outcome)
//!
//! Cycle::run
//!     → Acquisition::acquire → Ok  → Relay::send → outcome
//!                            → Err → false, no relay
//! ```
//!
//! # Design Decisions
//! - Collaborators are injected once at startup; nothing is looked up globally
//! - Foreground and background cycles are not synchronized with each other
//! - Every failure degrades to `false`; nothing escapes to the host

pub mod cycle;
pub mod presenter;
pub mod entry;

pub use cycle::{Cycle, TriggerSource};
pub use presenter::Presenter;
pub use entry::CycleTrigger;
