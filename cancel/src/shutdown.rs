//! ShutdownScope cancels a token when the process receives SIGINT or SIGTERM.
//!
//! Usually paired with [`ShutdownScope::wait`] in `main`: the scope resolves when a
//! signal arrives, when the parent token fires, or when a background task reports a
//! fatal error through a channel.
use std::io;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::cause::Cause;
use crate::token::CancelToken;

/// Dropping the scope stops the listener but not the process-wide handlers: once a scope
/// has been created, SIGINT and SIGTERM no longer terminate the process on their own.
pub struct ShutdownScope {
    token: CancelToken,
    listener: JoinHandle<()>,
}

impl ShutdownScope {
    /// Derives a child of `parent` and starts listening for shutdown signals.
    ///
    /// The handlers are registered before this returns, a signal raised right after is not
    /// lost. Must be called from within a tokio runtime.
    pub fn new(parent: &CancelToken) -> io::Result<Self> {
        let token = parent.child();
        let signals = Signals::register()?;
        let listener = tokio::spawn(listen(signals, token.clone()));
        Ok(Self { token, listener })
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn cancel(&self) -> bool {
        self.token.cancel()
    }

    /// Waits for the scope to end, see [`wait`].
    pub async fn wait(&self, errors: Option<mpsc::Receiver<anyhow::Error>>) -> anyhow::Result<()> {
        wait(&self.token, errors).await
    }
}

impl Drop for ShutdownScope {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

/// Waits until `token` fires or an error is received on `errors`.
///
/// Returns the token's [`Cause`] as the error when it fires, the received error when one
/// arrives first, and `Ok(())` when the channel is closed without reporting anything.
pub async fn wait(
    token: &CancelToken,
    errors: Option<mpsc::Receiver<anyhow::Error>>,
) -> anyhow::Result<()> {
    let Some(mut errors) = errors else {
        return Err(token.cancelled().await.into());
    };
    tokio::select! {
        cause = token.cancelled() => Err(cause.into()),
        received = errors.recv() => match received {
            Some(e) => Err(e),
            None => Ok(()),
        },
    }
}

async fn listen(mut signals: Signals, token: CancelToken) {
    tokio::select! {
        name = signals.recv() => {
            info!(signal = name, "shutdown signal received");
            token.cancel_with_cause(Cause::Signal(name.to_owned()));
        }
        _ = token.cancelled() => {}
    }
}

#[cfg(unix)]
struct Signals {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Signals {
    fn register() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            Some(()) = self.interrupt.recv() => "SIGINT",
            Some(()) = self.terminate.recv() => "SIGTERM",
            else => std::future::pending().await,
        }
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn register() -> io::Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "CTRL_C",
            Err(_) => std::future::pending().await,
        }
    }
}
