//! FlushMonitor tells the background task when the buffer is due for a timed flush.
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct FlushMonitor {
    last_flush: Instant,
    flush_period: Duration,
}

impl FlushMonitor {
    pub fn new(flush_period: Duration) -> Self {
        Self {
            last_flush: Instant::now(),
            flush_period,
        }
    }

    pub fn flush_period(&self) -> Duration {
        self.flush_period
    }

    pub fn last_flush_at(&self) -> Instant {
        self.last_flush
    }

    pub fn time_to_flush(&self) -> Duration {
        self.flush_period.saturating_sub(self.last_flush.elapsed())
    }

    /// True once a full period has elapsed since the last flush, whatever triggered it.
    pub fn is_due(&self) -> bool {
        self.last_flush.elapsed() >= self.flush_period
    }

    pub fn mark_flushed(&mut self) {
        self.last_flush = Instant::now();
    }
}
