//! Error types returned by the buffered writer

use drainpipe_cancel::Cause;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The writer's token fired, nothing was handed to the sink
    #[error("writer is closed")]
    Closed(#[source] Cause),

    #[error("sink error")]
    Sink(#[source] io::Error),

    /// The bytes were accepted but the flush they triggered failed
    #[error("flush after write failed")]
    Flush(#[source] io::Error),

    #[error("invalid writer configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
