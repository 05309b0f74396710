//! Health metric relay library.

pub mod acquisition;
pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod relay;
pub mod scheduler;
pub mod trigger;

pub use config::schema::RelayAppConfig;
pub use lifecycle::{App, Shutdown};
pub use trigger::{CycleTrigger, Presenter};
