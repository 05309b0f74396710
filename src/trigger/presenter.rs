//! Visibility hook for the user-facing surface.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::health::{Authorization, MetricKind};
use crate::trigger::entry::CycleTrigger;

/// What the user-facing surface calls when it becomes visible.
pub struct Presenter {
    authorization: Arc<dyn Authorization>,
    trigger: Arc<CycleTrigger>,
}

impl Presenter {
    /// Hook that asks `authorization` for consent before each foreground cycle.
    pub fn new(authorization: Arc<dyn Authorization>, trigger: Arc<CycleTrigger>) -> Self {
        Self { authorization, trigger }
    }

    /// Ask for read access, then start a foreground cycle.
    ///
    /// The cycle runs regardless of the consent outcome; unauthorized reads
    /// simply fail. The returned handle may be ignored.
    pub async fn on_visible(&self) -> JoinHandle<bool> {
        let granted = self.authorization.request_authorization(&MetricKind::ALL).await;
        if !granted {
            tracing::warn!("Health data access not granted, cycle will likely fail");
        }
        self.trigger.foreground()
    }
}
