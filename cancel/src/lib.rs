//! Cancellation for drainpipe
//!
//! A [`CancelToken`] is a one-shot broadcast: once fired it stays fired and every observer
//! sees the same [`Cause`]. Tokens form a tree, cancelling a parent cancels all of its
//! children while cancelling a child leaves the parent untouched.
//!
//! [`ShutdownScope`] wires SIGINT / SIGTERM to a token so that a process can drain its
//! writers gracefully.
//!
//! # Examples
//! ```
//! use drainpipe_cancel::{CancelToken, Cause};
//!
//! let root = CancelToken::new();
//! let child = root.child();
//! assert!(!child.is_cancelled());
//!
//! root.cancel();
//! assert_eq!(child.cause(), Some(Cause::Canceled));
//! ```

// crate-specific lint exceptions:
#![allow(clippy::missing_errors_doc)]

pub mod cause;
pub mod shutdown;
pub mod token;

pub use cause::Cause;
pub use shutdown::{ShutdownScope, wait};
pub use token::CancelToken;
