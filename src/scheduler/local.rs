//! In-process host scheduler.
//!
//! Plays the operating system's role when the relay runs as a daemon: holds at
//! most one pending request per task, throttles launches to `min_interval_secs`,
//! and issues grants that expire after `grant_window_secs`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{broadcast, watch, Notify};
use tokio::time::{self, Instant};

use crate::config::SchedulerConfig;
use crate::observability::metrics;
use crate::scheduler::grant::BackgroundGrant;
use crate::scheduler::host::{BackgroundScheduler, GrantHandler, RefreshRequest, ScheduleError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// How a launched grant ended, as observed by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    Success,
    Failure,
    /// The handler let the grant go without calling `complete`.
    Dropped,
}

impl GrantOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantOutcome::Success => "success",
            GrantOutcome::Failure => "failure",
            GrantOutcome::Dropped => "dropped",
        }
    }
}

pub struct LocalScheduler {
    min_interval: Duration,
    grant_window: Duration,
    handlers: Mutex<HashMap<String, Arc<dyn GrantHandler>>>,
    pending: Mutex<HashMap<String, RefreshRequest>>,
    last_launch: Mutex<HashMap<String, Instant>>,
    outcomes: Arc<Mutex<HashMap<String, GrantOutcome>>>,
    wake: Notify,
    revoke: watch::Sender<bool>,
}

impl LocalScheduler {
    /// Scheduler with the throttle and grant window from `config`.
    pub fn new(config: &SchedulerConfig) -> Self {
        let (revoke, _) = watch::channel(false);
        Self {
            min_interval: Duration::from_secs(config.min_interval_secs),
            grant_window: Duration::from_secs(config.grant_window_secs),
            handlers: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            last_launch: Mutex::new(HashMap::new()),
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            wake: Notify::new(),
            revoke,
        }
    }

    /// Number of requests waiting to launch.
    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    /// How the most recent grant for `task_id` ended, once it has.
    pub fn last_outcome(&self, task_id: &str) -> Option<GrantOutcome> {
        lock(&self.outcomes).get(task_id).copied()
    }

    fn is_closed(&self) -> bool {
        *self.revoke.borrow()
    }

    /// The pending request that becomes due first.
    fn next_due(&self) -> Option<(String, Instant)> {
        let now = Instant::now();
        let pending = lock(&self.pending);
        let last_launch = lock(&self.last_launch);

        pending
            .values()
            .map(|request| {
                let requested = request
                    .earliest_begin
                    .and_then(|at| (at - Utc::now()).to_std().ok())
                    .map_or(now, |delay| now + delay);
                let throttled = last_launch
                    .get(&request.task_id)
                    .map_or(now, |last| *last + self.min_interval);
                (request.task_id.clone(), requested.max(throttled))
            })
            .min_by_key(|(_, due)| *due)
    }

    fn launch(&self, task_id: &str) {
        let Some(request) = lock(&self.pending).remove(task_id) else {
            return;
        };
        let Some(handler) = lock(&self.handlers).get(&request.task_id).cloned() else {
            tracing::warn!(task_id = %request.task_id, "Dropping request for unregistered task");
            return;
        };
        lock(&self.last_launch).insert(request.task_id.clone(), Instant::now());

        let (grant, completion) =
            BackgroundGrant::new(request.task_id.clone(), self.grant_window, self.revoke.subscribe());
        tracing::info!(
            task_id = %request.task_id,
            window_secs = self.grant_window.as_secs(),
            "Issuing background grant"
        );

        tokio::spawn(async move {
            handler.handle(grant).await;
        });

        let task_id = request.task_id;
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let outcome = match completion.await {
                Ok(true) => GrantOutcome::Success,
                Ok(false) => GrantOutcome::Failure,
                Err(_) => GrantOutcome::Dropped,
            };
            if outcome == GrantOutcome::Dropped {
                tracing::error!(task_id = %task_id, "Background grant dropped without completion");
            } else {
                tracing::info!(task_id = %task_id, outcome = outcome.as_str(), "Background grant completed");
            }
            metrics::record_grant(outcome.as_str());
            lock(&outcomes).insert(task_id, outcome);
        });
    }

    /// Launch due requests until shutdown. Revokes outstanding grants on exit.
    pub async fn run(self: Arc<Self>, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            min_interval_secs = self.min_interval.as_secs(),
            grant_window_secs = self.grant_window.as_secs(),
            "Background scheduler starting"
        );

        loop {
            let next = self.next_due();
            let due = async {
                match &next {
                    Some((_, at)) => time::sleep_until(*at).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                _ = due => {
                    if let Some((task_id, _)) = &next {
                        self.launch(task_id);
                    }
                }
                _ = self.wake.notified() => {}
                _ = shutdown.recv() => {
                    tracing::info!("Background scheduler received shutdown signal, revoking grants");
                    self.revoke.send_replace(true);
                    break;
                }
            }
        }
    }
}

impl BackgroundScheduler for LocalScheduler {
    fn register(&self, task_id: &str, handler: Arc<dyn GrantHandler>) -> Result<(), ScheduleError> {
        let mut handlers = lock(&self.handlers);
        if handlers.contains_key(task_id) {
            return Err(ScheduleError::AlreadyRegistered(task_id.to_string()));
        }
        handlers.insert(task_id.to_string(), handler);
        tracing::debug!(task_id, "Registered background task");
        Ok(())
    }

    fn submit(&self, request: RefreshRequest) -> Result<(), ScheduleError> {
        if self.is_closed() {
            return Err(ScheduleError::Closed);
        }
        if !lock(&self.handlers).contains_key(&request.task_id) {
            return Err(ScheduleError::UnknownTask(request.task_id));
        }
        tracing::debug!(task_id = %request.task_id, earliest_begin = ?request.earliest_begin, "Refresh submitted");
        lock(&self.pending).insert(request.task_id.clone(), request);
        self.wake.notify_one();
        Ok(())
    }
}
