//! Why a token fired
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    #[error("context canceled")]
    Canceled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// Cancelled by a process signal, holds the signal name (`SIGINT`, `SIGTERM`, ...)
    #[error("context canceled: {0}")]
    Signal(String),
}

impl Cause {
    /// A signal is a cancellation too, only deadlines are not.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Cause::Canceled | Cause::Signal(_))
    }

    pub fn signal(&self) -> Option<&str> {
        match self {
            Cause::Signal(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_cause_is_a_cancellation() {
        let cause = Cause::Signal("SIGINT".to_owned());
        assert!(cause.is_canceled());
        assert_eq!(cause.signal(), Some("SIGINT"));
        assert_eq!(cause.to_string(), "context canceled: SIGINT");
    }

    #[test]
    fn deadline_is_not_a_cancellation() {
        assert!(!Cause::DeadlineExceeded.is_canceled());
        assert_eq!(Cause::DeadlineExceeded.signal(), None);
        assert_eq!(Cause::Canceled.to_string(), "context canceled");
    }
}
