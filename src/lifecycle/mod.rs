//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     build:  Config → FileStore → readers → coordinator → HttpRelay
//!             → LocalScheduler → CycleTrigger → Presenter
//!     start:  Presenter (authorization + foreground cycle)
//!             → CycleTrigger registered, first grant requested
//!             → LocalScheduler::run spawned
//!
//! Shutdown (shutdown.rs):
//!     Signal received → broadcast → scheduler revokes grants → exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → graceful shutdown
//!     SIGUSR1        → visibility gained (authorization + foreground cycle)
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, relay validated before anything is scheduled
//! - Consent is requested before the first grant can launch
//! - Each collaborator is built once and passed explicitly

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use signals::{wait_for_signal, Signal};
pub use startup::{App, StartupError};
