//! Writes a heartbeat line to stdout through a buffered writer until Ctrl+C.
//!
//! Lines are flushed every 16 lines or every 500ms, whichever comes first, and the pending
//! lines are drained when the process is asked to stop.
//!
//! ```bash
//! DRAINPIPE_LOG=drainpipe_writer=debug cargo run --example shutdown_demo
//! ```

use drainpipe::logging::init_logging;
use drainpipe::prelude::*;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    let scope = ShutdownScope::new(&CancelToken::new())?;
    let config = WriterConfig::default()
        .with_max_buffer_size(16 * 24)
        .with_flush_interval(Duration::from_millis(500));
    let (writer, mut disposer) =
        BufferedWriter::with_config(scope.token(), IoSink::new(tokio::io::stdout()), config)?;
    let (errors_sender, errors) = mpsc::channel(1);

    let producer = tokio::spawn({
        let writer = writer.clone();
        async move {
            let mut beat: u64 = 0;
            loop {
                let line = format!("heartbeat {beat:>12}\n");
                if let Err(e) = writer.write(line.as_bytes()).await {
                    if !e.is_closed() {
                        let _ = errors_sender.send(e.into()).await;
                    }
                    return;
                }
                beat += 1;
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    });

    info!("press Ctrl+C to stop");
    if let Err(e) = scope.wait(Some(errors)).await {
        info!("shutting down: {e}");
    }
    disposer.dispose().await;
    if let Err(e) = producer.await {
        error!("producer task failed: {e}");
    }
    Ok(())
}
