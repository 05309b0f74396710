//! OS signal handling.

/// Signals the daemon reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// SIGINT or SIGTERM.
    Shutdown,
    /// SIGUSR1: treat as the user-facing surface becoming visible.
    Visible,
}

/// Wait for the next signal of interest.
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<Signal> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut term = signal(SignalKind::terminate())?;
    let mut usr1 = signal(SignalKind::user_defined1())?;

    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| Signal::Shutdown),
        _ = term.recv() => Ok(Signal::Shutdown),
        _ = usr1.recv() => Ok(Signal::Visible),
    }
}

/// Wait for the next signal of interest.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> std::io::Result<Signal> {
    tokio::signal::ctrl_c().await.map(|_| Signal::Shutdown)
}
