//! drainpipe : buffered writes that survive shutdown
//!
//! Re-exports the cancellation and writer crates and provides a logging bootstrap for
//! applications.

pub mod cancel {
    pub use drainpipe_cancel::*;
}

pub mod writer {
    pub use drainpipe_writer::*;
}

pub mod logging;

pub mod prelude {
    pub use drainpipe_cancel::{CancelToken, Cause, ShutdownScope};
    pub use drainpipe_writer::{BufferedWriter, Disposer, IoSink, Sink, WriterConfig};
}
