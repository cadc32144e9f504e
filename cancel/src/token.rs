//! CancelToken is a one-shot signal observable through `is_cancelled`, `cause` and `cancelled`.
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::cause::Cause;

#[derive(Clone)]
pub struct CancelToken {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    state: watch::Sender<Option<Cause>>,
    parent: Option<CancelToken>,
}

impl CancelToken {
    /// Creates a root token, it only fires when cancelled explicitly.
    pub fn new() -> Self {
        Self::with_parent(None)
    }

    fn with_parent(parent: Option<CancelToken>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            inner: Arc::new(TokenInner { state, parent }),
        }
    }

    /// Derives a token that fires when this one does, or when cancelled on its own.
    pub fn child(&self) -> Self {
        Self::with_parent(Some(self.clone()))
    }

    /// Derives a token that fires with [`Cause::DeadlineExceeded`] once `timeout` has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let token = self.child();
        let watcher = token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    watcher.cancel_with_cause(Cause::DeadlineExceeded);
                }
                _ = watcher.cancelled() => {}
            }
        });
        token
    }

    pub fn cancel(&self) -> bool {
        self.cancel_with_cause(Cause::Canceled)
    }

    /// Fires the token. Returns false if it had already fired, in which case the
    /// original cause is kept.
    pub fn cancel_with_cause(&self, cause: Cause) -> bool {
        let parent = self.inner.parent.as_ref();
        self.inner.state.send_if_modified(|state| {
            if state.is_some() || parent.is_some_and(CancelToken::is_cancelled) {
                return false;
            }
            *state = Some(cause);
            true
        })
    }

    pub fn is_cancelled(&self) -> bool {
        self.cause().is_some()
    }

    pub fn cause(&self) -> Option<Cause> {
        if let Some(cause) = self.inner.state.borrow().as_ref() {
            return Some(cause.clone());
        }
        self.inner.parent.as_ref().and_then(CancelToken::cause)
    }

    /// Completes once this token or one of its ancestors has fired.
    pub async fn cancelled(&self) -> Cause {
        self.cancelled_boxed().await
    }

    fn cancelled_boxed(&self) -> Pin<Box<dyn Future<Output = Cause> + Send + '_>> {
        Box::pin(async move {
            let mut own = self.inner.state.subscribe();
            match &self.inner.parent {
                None => wait_for_cause(&mut own).await,
                Some(parent) => tokio::select! {
                    cause = wait_for_cause(&mut own) => cause,
                    cause = parent.cancelled_boxed() => cause,
                },
            }
        })
    }
}

async fn wait_for_cause(receiver: &mut watch::Receiver<Option<Cause>>) -> Cause {
    let cause = receiver
        .wait_for(Option::is_some)
        .await
        .ok()
        .and_then(|state| state.clone());
    match cause {
        Some(cause) => cause,
        // the sender lives as long as the token being awaited
        None => std::future::pending().await,
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("cause", &self.cause())
            .field("has_parent", &self.inner.parent.is_some())
            .finish()
    }
}
