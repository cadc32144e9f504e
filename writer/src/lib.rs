//! Concurrent auto-flushing buffered writer
//!
//! [`BufferedWriter`] batches writes to a [`Sink`] and flushes when a size threshold is
//! crossed, when a time interval elapses, or when its cancellation token fires.
//!
//! # Examples
//! ```
//! use drainpipe_cancel::CancelToken;
//! use drainpipe_writer::{BufferedWriter, test_utils::SharedBuffer};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), drainpipe_writer::Error> {
//! let sink = SharedBuffer::new();
//! let (writer, mut disposer) =
//!     BufferedWriter::new(&CancelToken::new(), sink.clone(), 15, Duration::from_millis(100))?;
//!
//! writer.write(b"Hello, World!").await?;
//! assert!(sink.is_empty());
//!
//! writer.flush().await?;
//! assert_eq!(sink.as_string(), "Hello, World!");
//!
//! disposer.dispose().await;
//! assert!(writer.write(b"x").await.is_err());
//! # Ok(())
//! # }
//! ```

// crate-specific lint exceptions:
#![allow(clippy::missing_errors_doc, clippy::new_without_default)]

pub mod buffered_writer;
pub mod config;
pub mod errors;
pub mod flush_monitor;
pub mod sink;
pub mod test_utils;

pub use buffered_writer::{BufferedWriter, Disposer};
pub use config::WriterConfig;
pub use errors::{Error, Result};
pub use sink::{IoSink, Sink};
