//! BufferedWriter accumulates bytes in memory and hands them to a [`Sink`] in batches.
//!
//! A flush happens
//!  - synchronously inside `write` when the buffered byte count reaches `max_buffer_size`,
//!  - when `flush` is called,
//!  - from a background task once `flush_interval` has elapsed since the last flush,
//!  - one last time, best-effort, when the writer's token is cancelled.
//!
//! All of the above go through a single lock that is held for the duration of the sink
//! write: a slow sink stalls every writer and the background task.
use drainpipe_cancel::{CancelToken, Cause};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::config::WriterConfig;
use crate::errors::{Error, Result};
use crate::flush_monitor::FlushMonitor;
use crate::sink::Sink;

#[derive(Debug, Clone, Copy)]
enum FlushTrigger {
    Size,
    Explicit,
    Interval,
    Final,
}

impl FlushTrigger {
    fn as_str(self) -> &'static str {
        match self {
            FlushTrigger::Size => "size",
            FlushTrigger::Explicit => "explicit",
            FlushTrigger::Interval => "interval",
            FlushTrigger::Final => "final",
        }
    }
}

struct BufferState {
    sink: Box<dyn Sink>,
    pending: Vec<u8>,
    // bytes accepted since the last successful flush
    current_buffer_size: usize,
    monitor: FlushMonitor,
    // set once the final flush has run, no more appends after that
    sealed: bool,
}

impl BufferState {
    async fn flush(&mut self, trigger: FlushTrigger) -> io::Result<()> {
        let nb_bytes = self.pending.len();
        while !self.pending.is_empty() {
            let written = self.sink.write(&self.pending).await?;
            if written == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "sink accepted no bytes",
                ));
            }
            // what the sink already took must not be handed over again on retry
            self.pending.drain(..written.min(self.pending.len()));
        }
        self.sink.flush().await?;
        self.current_buffer_size = 0;
        self.monitor.mark_flushed();
        debug!(trigger = trigger.as_str(), nb_bytes, "flushed");
        Ok(())
    }
}

struct Shared {
    state: Mutex<BufferState>,
    token: CancelToken,
    max_buffer_size: usize,
    flush_interval: Duration,
}

impl Shared {
    fn closed_error(&self) -> Error {
        Error::Closed(self.token.cause().unwrap_or(Cause::Canceled))
    }
}

/// Thread-safe buffered writer, clones share the same buffer and sink.
#[derive(Clone)]
pub struct BufferedWriter {
    shared: Arc<Shared>,
}

impl BufferedWriter {
    /// Creates a writer over `sink` and starts its background flush task.
    ///
    /// The writer runs under a child of `parent`: cancelling `parent` shuts it down like
    /// the returned [`Disposer`] does. Must be called from within a tokio runtime.
    pub fn new<S>(
        parent: &CancelToken,
        sink: S,
        max_buffer_size: usize,
        flush_interval: Duration,
    ) -> Result<(Self, Disposer)>
    where
        S: Sink + 'static,
    {
        Self::with_config(
            parent,
            sink,
            WriterConfig::new(max_buffer_size, flush_interval),
        )
    }

    pub fn with_config<S>(
        parent: &CancelToken,
        sink: S,
        config: WriterConfig,
    ) -> Result<(Self, Disposer)>
    where
        S: Sink + 'static,
    {
        config.validate()?;
        let shared = Arc::new(Shared {
            state: Mutex::new(BufferState {
                sink: Box::new(sink),
                pending: Vec::new(),
                current_buffer_size: 0,
                monitor: FlushMonitor::new(config.flush_interval),
                sealed: false,
            }),
            token: parent.child(),
            max_buffer_size: config.max_buffer_size,
            flush_interval: config.flush_interval,
        });
        let task = tokio::spawn(flush_task(shared.clone()));
        let writer = Self { shared };
        let disposer = Disposer {
            writer: writer.clone(),
            task: Some(task),
        };
        Ok((writer, disposer))
    }

    /// Buffers `data`, flushing to the sink before returning if the size threshold is reached.
    ///
    /// Returns [`Error::Closed`] without touching the buffer once the writer's token has
    /// fired. An [`Error::Flush`] means the bytes were accepted but the flush they
    /// triggered failed, they stay buffered for the next flush.
    pub async fn write(&self, data: &[u8]) -> Result<usize> {
        if self.shared.token.is_cancelled() {
            return Err(self.shared.closed_error());
        }

        let mut state = self.shared.state.lock().await;
        if state.sealed {
            return Err(self.shared.closed_error());
        }
        state.pending.extend_from_slice(data);
        state.current_buffer_size += data.len();

        if state.current_buffer_size >= self.shared.max_buffer_size {
            state
                .flush(FlushTrigger::Size)
                .await
                .map_err(Error::Flush)?;
        }
        Ok(data.len())
    }

    /// Hands every buffered byte to the sink. On failure the counters are left as they were
    /// so the flush can be retried.
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.shared.state.lock().await;
        state
            .flush(FlushTrigger::Explicit)
            .await
            .map_err(Error::Sink)
    }

    /// Number of bytes accepted since the last successful flush
    pub async fn buffered_len(&self) -> usize {
        self.shared.state.lock().await.current_buffer_size
    }

    pub async fn last_flush_at(&self) -> Instant {
        self.shared.state.lock().await.monitor.last_flush_at()
    }

    pub fn max_buffer_size(&self) -> usize {
        self.shared.max_buffer_size
    }

    pub fn flush_interval(&self) -> Duration {
        self.shared.flush_interval
    }

    pub fn is_closed(&self) -> bool {
        self.shared.token.is_cancelled()
    }

    pub fn token(&self) -> &CancelToken {
        &self.shared.token
    }
}

/// Shuts a [`BufferedWriter`] down.
///
/// Dropping it without calling [`Disposer::dispose`] still cancels the writer, the
/// background task then runs its final flush on its own.
pub struct Disposer {
    writer: BufferedWriter,
    task: Option<JoinHandle<()>>,
}

impl Disposer {
    /// Flushes what is buffered, cancels the writer and waits for the background task to
    /// complete its final flush. Calling it again does nothing.
    pub async fn dispose(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if let Err(e) = self.writer.flush().await {
            warn!("flush on dispose failed: {e:?}");
        }
        self.writer.shared.token.cancel();
        if let Err(e) = task.await {
            warn!("flush task ended abnormally: {e:?}");
        }
    }
}

impl Drop for Disposer {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.writer.shared.token.cancel();
        }
    }
}

async fn flush_task(shared: Arc<Shared>) {
    let period = shared.flush_interval;
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            cause = shared.token.cancelled() => {
                let mut state = shared.state.lock().await;
                // nobody is waiting on this one, failures are only logged
                if let Err(e) = state.flush(FlushTrigger::Final).await {
                    warn!("final flush failed: {e:?}");
                }
                state.sealed = true;
                debug!(%cause, "flush task stopped");
                return;
            }
            _ = ticker.tick() => {
                let mut state = shared.state.lock().await;
                if state.monitor.is_due() {
                    if let Err(e) = state.flush(FlushTrigger::Interval).await {
                        warn!("timed flush failed: {e:?}");
                    }
                }
            }
        }
    }
}
