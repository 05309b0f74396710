//! Startup orchestration.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::acquisition::{AcquisitionCoordinator, HeartRateReader, StepCountReader};
use crate::config::RelayAppConfig;
use crate::health::FileStore;
use crate::relay::{HttpRelay, RelayError};
use crate::scheduler::{LocalScheduler, ScheduleError};
use crate::trigger::{Cycle, CycleTrigger, Presenter};

/// Errors that abort startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// The wired-up relay.
pub struct App {
    pub scheduler: Arc<LocalScheduler>,
    pub trigger: Arc<CycleTrigger>,
    pub presenter: Presenter,
}

impl App {
    /// Build every collaborator once, in dependency order.
    ///
    /// The background task is not registered yet; see [`App::install`].
    pub fn build(config: &RelayAppConfig) -> Result<Self, StartupError> {
        let relay = Arc::new(HttpRelay::new(&config.relay)?);
        tracing::info!(endpoint = %relay.endpoint(), "Relay configured");

        let store = Arc::new(FileStore::new(&config.source.path, config.source.grant_access));
        tracing::info!(path = ?store.path(), "Reading samples from export");

        let coordinator = Arc::new(AcquisitionCoordinator::new(
            Arc::new(HeartRateReader::new(store.clone())),
            Arc::new(StepCountReader::new(store.clone())),
        ));

        let scheduler = Arc::new(LocalScheduler::new(&config.scheduler));
        let trigger = Arc::new(CycleTrigger::new(
            Cycle::new(coordinator, relay),
            scheduler.clone(),
            config.scheduler.task_id.clone(),
        ));
        let presenter = Presenter::new(store, trigger.clone());

        Ok(Self {
            scheduler,
            trigger,
            presenter,
        })
    }

    /// Register the background task and request its first grant.
    pub fn install(&self) -> Result<(), StartupError> {
        self.trigger.install()?;
        tracing::info!(task_id = %self.trigger.task_id(), "Background task registered");
        Ok(())
    }

    /// Daemon startup: consent and a foreground cycle, then the background task.
    ///
    /// The first grant is due immediately, so the scheduler only starts once
    /// read access has been requested.
    pub async fn start(&self, shutdown: broadcast::Receiver<()>) -> Result<JoinHandle<()>, StartupError> {
        let _ = self.presenter.on_visible().await;
        self.install()?;
        Ok(tokio::spawn(self.scheduler.clone().run(shutdown)))
    }
}
