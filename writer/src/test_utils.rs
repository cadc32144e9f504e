//! In-memory sinks for tests and examples
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::sink::Sink;

#[derive(Default)]
struct SharedBufferState {
    bytes: Vec<u8>,
    write_calls: usize,
    flush_calls: usize,
}

/// Thread-safe byte buffer, every clone sees the same content.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    state: Arc<Mutex<SharedBufferState>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        self.state.lock().bytes.clone()
    }

    pub fn as_string(&self) -> String {
        String::from_utf8_lossy(&self.state.lock().bytes).into_owned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of `write` calls received, empty flushes don't count
    pub fn write_calls(&self) -> usize {
        self.state.lock().write_calls
    }

    pub fn flush_calls(&self) -> usize {
        self.state.lock().flush_calls
    }

    /// Clears the content, the call counters are kept
    pub fn reset(&self) {
        self.state.lock().bytes.clear();
    }
}

#[async_trait::async_trait]
impl Sink for SharedBuffer {
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self.state.lock();
        state.bytes.extend_from_slice(buf);
        state.write_calls += 1;
        Ok(buf.len())
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.state.lock().flush_calls += 1;
        Ok(())
    }
}

/// Wraps a [`SharedBuffer`], failing every call while the switch is on.
#[derive(Clone, Default)]
pub struct FailingSink {
    buffer: SharedBuffer,
    failing: Arc<AtomicBool>,
}

impl FailingSink {
    pub fn new(buffer: SharedBuffer) -> Self {
        Self {
            buffer,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> io::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink is failing"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Sink for FailingSink {
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.check()?;
        self.buffer.write(buf).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.check()?;
        self.buffer.flush().await
    }
}

/// Accepts at most `chunk_size` bytes per `write` call.
pub struct ChunkedSink {
    buffer: SharedBuffer,
    chunk_size: usize,
}

impl ChunkedSink {
    pub fn new(buffer: SharedBuffer, chunk_size: usize) -> Self {
        Self { buffer, chunk_size }
    }
}

#[async_trait::async_trait]
impl Sink for ChunkedSink {
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let end = buf.len().min(self.chunk_size);
        self.buffer.write(&buf[..end]).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.buffer.flush().await
    }
}
