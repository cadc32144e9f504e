use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Destination of the flushed bytes.
///
/// `write` may accept fewer bytes than offered, the writer keeps handing over the
/// remainder until everything is accepted, then calls `flush`.
#[async_trait::async_trait]
pub trait Sink: Send {
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
    async fn flush(&mut self) -> io::Result<()>;
}

/// Adapts any tokio `AsyncWrite` (files, stdout, sockets, `Vec<u8>`) into a [`Sink`]
pub struct IoSink<W> {
    inner: W,
}

impl<W> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[async_trait::async_trait]
impl<W> Sink for IoSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        AsyncWriteExt::write(&mut self.inner, buf).await
    }

    async fn flush(&mut self) -> io::Result<()> {
        AsyncWriteExt::flush(&mut self.inner).await
    }
}
