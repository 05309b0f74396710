//! Foreground and background entry points.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::scheduler::{BackgroundGrant, BackgroundScheduler, GrantHandler, RefreshRequest, ScheduleError};
use crate::trigger::cycle::{Cycle, TriggerSource};

/// Runs cycles on behalf of the user-facing surface and the host scheduler.
pub struct CycleTrigger {
    cycle: Cycle,
    scheduler: Arc<dyn BackgroundScheduler>,
    task_id: String,
}

impl CycleTrigger {
    /// Trigger for `cycle`, registered with `scheduler` as `task_id`.
    pub fn new(cycle: Cycle, scheduler: Arc<dyn BackgroundScheduler>, task_id: impl Into<String>) -> Self {
        Self {
            cycle,
            scheduler,
            task_id: task_id.into(),
        }
    }

    /// Identifier the background task is registered under.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Register as the handler for this trigger's task and request the first grant.
    pub fn install(self: &Arc<Self>) -> Result<(), ScheduleError> {
        self.scheduler.register(&self.task_id, self.clone())?;
        self.schedule_next()
    }

    /// Request the next grant, eligible immediately.
    pub fn schedule_next(&self) -> Result<(), ScheduleError> {
        self.scheduler.submit(RefreshRequest::immediate(self.task_id.clone()))
    }

    /// Run one cycle in the background. The outcome is logged, never surfaced.
    pub fn foreground(&self) -> JoinHandle<bool> {
        let cycle = self.cycle.clone();
        tokio::spawn(async move {
            let success = cycle.run(TriggerSource::Foreground).await;
            tracing::info!(success, "Foreground cycle finished");
            success
        })
    }

    /// Run one cycle under `grant`, re-arming before any work starts.
    pub async fn background(&self, mut grant: BackgroundGrant) {
        // Re-arm first so a failed or abandoned cycle keeps the task scheduled.
        if let Err(e) = self.schedule_next() {
            tracing::error!(task_id = %self.task_id, error = %e, "Could not schedule next background grant");
        }

        grant.begin();
        tracing::info!(task_id = %grant.task_id(), remaining_ms = grant.remaining().as_millis() as u64, "Handling background grant");

        let cycle = self.cycle.clone();
        let mut task = tokio::spawn(async move { cycle.run(TriggerSource::Background).await });

        let success = tokio::select! {
            joined = &mut task => match joined {
                Ok(success) => success,
                Err(e) => {
                    tracing::error!(error = %e, "Background cycle aborted");
                    false
                }
            },
            _ = grant.expired() => {
                task.abort();
                tracing::warn!(task_id = %grant.task_id(), "Grant expired before cycle finished, abandoning");
                metrics::record_cycle_expired(TriggerSource::Background.as_str());
                false
            }
        };

        grant.complete(success);
    }
}

#[async_trait]
impl GrantHandler for CycleTrigger {
    async fn handle(&self, grant: BackgroundGrant) {
        self.background(grant).await;
    }
}
