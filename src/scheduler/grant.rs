//! Single-use background execution grant.

use std::time::Duration;

use tokio::sync::{oneshot, watch};
use tokio::time::{self, Instant};

/// Lifecycle of a grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantState {
    Armed,
    Running,
    Completed,
}

/// A host-issued execution window with a mandatory completion signal.
#[derive(Debug)]
pub struct BackgroundGrant {
    task_id: String,
    state: GrantState,
    deadline: Instant,
    revoked: watch::Receiver<bool>,
    completion: Option<oneshot::Sender<bool>>,
}

impl BackgroundGrant {
    /// Create a grant valid for `window`, revocable through `revoked`.
    ///
    /// Returns the grant and the receiver on which its completion is reported.
    pub fn new(
        task_id: impl Into<String>,
        window: Duration,
        revoked: watch::Receiver<bool>,
    ) -> (Self, oneshot::Receiver<bool>) {
        let (tx, rx) = oneshot::channel();
        let grant = Self {
            task_id: task_id.into(),
            state: GrantState::Armed,
            deadline: Instant::now() + window,
            revoked,
            completion: Some(tx),
        };
        (grant, rx)
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn state(&self) -> GrantState {
        self.state
    }

    /// Time left before the window closes.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Armed → Running.
    pub fn begin(&mut self) {
        if self.state == GrantState::Armed {
            self.state = GrantState::Running;
        } else {
            tracing::warn!(task_id = %self.task_id, state = ?self.state, "Grant already started");
        }
    }

    /// Resolves once the window closes or the host revokes the grant.
    pub async fn expired(&self) {
        let mut revoked = self.revoked.clone();
        let revocation = async move {
            loop {
                if *revoked.borrow_and_update() {
                    return;
                }
                if revoked.changed().await.is_err() {
                    // Host is gone without revoking; only the deadline applies.
                    std::future::pending::<()>().await;
                }
            }
        };

        tokio::select! {
            _ = time::sleep_until(self.deadline) => {}
            _ = revocation => {}
        }
    }

    /// Signal completion to the host. Consumes the grant.
    pub fn complete(mut self, success: bool) {
        self.state = GrantState::Completed;
        if let Some(tx) = self.completion.take() {
            if tx.send(success).is_err() {
                tracing::debug!(task_id = %self.task_id, "Host stopped listening for grant completion");
            }
        }
    }
}
