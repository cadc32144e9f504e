//! Logging bootstrap for applications, libraries should only emit `tracing` events.
use tracing_subscriber::EnvFilter;

pub const LOG_FILTER_ENV: &str = "DRAINPIPE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Installs a global fmt subscriber writing to stderr.
///
/// The filter is read from `DRAINPIPE_LOG` using the `EnvFilter` syntax
/// (e.g. `drainpipe_writer=debug`), `info` when unset or invalid.
pub fn init_logging() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(make_filter())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))
}

fn make_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}
