//! Slow Cat Demo
//!
//! Copies stdin to the configured sink through a SlowWriter, so bursts of
//! input lines reach the output in at most one write per interval.
//!
//! Run with: cargo run -p demos --bin slow_cat -- [writer.toml] < input.txt

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::WriterConfig;
use observability::{LogFormat, ObservabilityConfig};
use slow_writer::create_writer;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the drained output.
    observability::init_with_config(ObservabilityConfig {
        log_format: LogFormat::Compact,
        metrics_port: None,
        default_log_level: "info".to_string(),
    })?;

    let config = match std::env::args().nth(1) {
        Some(path) => {
            tracing::info!(path = %path, "Loading writer config");
            ConfigLoader::load_from_path(Path::new(&path))
                .with_context(|| format!("failed to load config from {path}"))?
        }
        None => WriterConfig::new("slow_cat"),
    };

    let writer = create_writer(&config).await?;
    let metrics = writer.metrics().clone();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut warned = false;
    while let Some(line) = lines.next_line().await? {
        let ack = writer.write(format!("{line}\n").as_bytes()).await?;
        // Last error is sticky; report it once.
        if let (Some(err), false) = (&ack.last_error, warned) {
            tracing::warn!(error = %err, "An earlier drain failed");
            warned = true;
        }
    }

    let result = writer.close().await;
    tracing::info!(summary = %metrics.snapshot(), "Input exhausted");
    result?;
    Ok(())
}
