//! Writer thresholds, overridable through the environment
use std::str::FromStr;
use std::time::Duration;

use crate::errors::{Error, Result};

pub const DEFAULT_MAX_BUFFER_SIZE: usize = 4096;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(1000);

pub const MAX_BUFFER_SIZE_ENV: &str = "DRAINPIPE_MAX_BUFFER_SIZE";
pub const FLUSH_INTERVAL_MS_ENV: &str = "DRAINPIPE_FLUSH_INTERVAL_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterConfig {
    /// A write that brings the buffered byte count to this value flushes before returning
    pub max_buffer_size: usize,
    /// The background task flushes once this much time has passed since the last flush
    pub flush_interval: Duration,
}

impl WriterConfig {
    pub fn new(max_buffer_size: usize, flush_interval: Duration) -> Self {
        Self {
            max_buffer_size,
            flush_interval,
        }
    }

    #[must_use]
    pub fn with_max_buffer_size(mut self, max_buffer_size: usize) -> Self {
        self.max_buffer_size = max_buffer_size;
        self
    }

    #[must_use]
    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_buffer_size == 0 {
            return Err(Error::InvalidConfig(
                "max_buffer_size must be greater than zero".to_owned(),
            ));
        }
        if self.flush_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "flush_interval must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        // unset or unparsable variables fall back to the defaults
        let max_buffer_size = env_or(MAX_BUFFER_SIZE_ENV, DEFAULT_MAX_BUFFER_SIZE);
        let flush_interval = env_or::<u64>(FLUSH_INTERVAL_MS_ENV, 0);
        let flush_interval = if flush_interval == 0 {
            DEFAULT_FLUSH_INTERVAL
        } else {
            Duration::from_millis(flush_interval)
        };
        Self::new(max_buffer_size, flush_interval)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        unsafe {
            std::env::remove_var(MAX_BUFFER_SIZE_ENV);
            std::env::remove_var(FLUSH_INTERVAL_MS_ENV);
        }
    }

    #[test]
    #[serial]
    fn default_without_env() {
        clear_env();
        let config = WriterConfig::default();
        assert_eq!(config.max_buffer_size, DEFAULT_MAX_BUFFER_SIZE);
        assert_eq!(config.flush_interval, DEFAULT_FLUSH_INTERVAL);
    }

    #[test]
    #[serial]
    fn default_reads_env() {
        unsafe {
            std::env::set_var(MAX_BUFFER_SIZE_ENV, "15");
            std::env::set_var(FLUSH_INTERVAL_MS_ENV, "100");
        }
        let config = WriterConfig::default();
        clear_env();
        assert_eq!(config.max_buffer_size, 15);
        assert_eq!(config.flush_interval, Duration::from_millis(100));
    }

    #[test]
    #[serial]
    fn default_ignores_garbage() {
        unsafe {
            std::env::set_var(MAX_BUFFER_SIZE_ENV, "lots");
            std::env::set_var(FLUSH_INTERVAL_MS_ENV, "-3");
        }
        let config = WriterConfig::default();
        clear_env();
        assert_eq!(
            config,
            WriterConfig::new(DEFAULT_MAX_BUFFER_SIZE, DEFAULT_FLUSH_INTERVAL)
        );
    }

    #[test]
    fn validate_rejects_zero() {
        let config = WriterConfig::new(15, Duration::from_millis(100));
        assert!(config.validate().is_ok());
        assert!(matches!(
            config.with_max_buffer_size(0).validate(),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            config.with_flush_interval(Duration::ZERO).validate(),
            Err(Error::InvalidConfig(_))
        ));
    }
}
