//! Host scheduler contracts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::scheduler::grant::BackgroundGrant;

/// Errors from the host scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("no handler registered for task '{0}'")]
    UnknownTask(String),

    #[error("a handler is already registered for task '{0}'")]
    AlreadyRegistered(String),

    #[error("scheduler is shut down")]
    Closed,
}

/// Ask the host to run a task once more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshRequest {
    pub task_id: String,
    /// Earliest time the task may run. `None` means eligible immediately.
    pub earliest_begin: Option<DateTime<Utc>>,
}

impl RefreshRequest {
    /// A request that may launch as soon as the throttle allows.
    pub fn immediate(task_id: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            earliest_begin: None,
        }
    }
}

/// Work the host runs when a grant for a registered task is issued.
#[async_trait]
pub trait GrantHandler: Send + Sync {
    async fn handle(&self, grant: BackgroundGrant);
}

/// The host's background execution scheduler.
pub trait BackgroundScheduler: Send + Sync {
    /// Register the handler for `task_id`. Done once per task.
    fn register(&self, task_id: &str, handler: Arc<dyn GrantHandler>) -> Result<(), ScheduleError>;

    /// Request a future grant. Replaces any pending request for the same task.
    fn submit(&self, request: RefreshRequest) -> Result<(), ScheduleError>;
}
