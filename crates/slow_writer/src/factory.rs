//! Build sinks and writers from configuration

use contracts::{ByteSink, SinkConfig, SinkError, SinkType, WriterConfig};
use tokio::fs::File;
use tokio::io::{Stderr, Stdout};
use tracing::{info, instrument};

use crate::error::WriterError;
use crate::sinks::{IoSink, LogSink};
use crate::writer::{SlowWriter, WriterOptions};

/// Any sink that can be described by a [`SinkConfig`]
pub enum ConfiguredSink {
    Stdout(IoSink<Stdout>),
    Stderr(IoSink<Stderr>),
    File(IoSink<File>),
    Log(LogSink),
}

impl ByteSink for ConfiguredSink {
    fn name(&self) -> &str {
        match self {
            Self::Stdout(sink) => sink.name(),
            Self::Stderr(sink) => sink.name(),
            Self::File(sink) => sink.name(),
            Self::Log(sink) => sink.name(),
        }
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        match self {
            Self::Stdout(sink) => sink.write(bytes).await,
            Self::Stderr(sink) => sink.write(bytes).await,
            Self::File(sink) => sink.write(bytes).await,
            Self::Log(sink) => sink.write(bytes).await,
        }
    }
}

/// Create a sink from configuration
#[instrument(
    name = "slow_writer_create_sink",
    skip(config),
    fields(sink = %name, sink_type = ?config.sink_type)
)]
pub async fn create_sink(name: &str, config: &SinkConfig) -> Result<ConfiguredSink, WriterError> {
    let sink = match config.sink_type {
        SinkType::Stdout => ConfiguredSink::Stdout(IoSink::stdout(name)),
        SinkType::Stderr => ConfiguredSink::Stderr(IoSink::stderr(name)),
        SinkType::Log => ConfiguredSink::Log(LogSink::new(name)),
        SinkType::File => {
            let path = config
                .params
                .get("path")
                .ok_or_else(|| WriterError::sink_creation(name, "missing 'path' param"))?;
            let sink = IoSink::create_file(name, path)
                .await
                .map_err(|e| WriterError::sink_creation(name, e.to_string()))?;
            ConfiguredSink::File(sink)
        }
    };
    Ok(sink)
}

/// Convenience function to create a running writer from configuration
#[instrument(name = "slow_writer_create", skip(config), fields(writer = %config.name))]
pub async fn create_writer(config: &WriterConfig) -> Result<SlowWriter, WriterError> {
    let sink = create_sink(&config.name, &config.sink).await?;
    let writer = SlowWriter::with_options(sink, WriterOptions::from(config));

    info!(
        writer = %config.name,
        sink_type = ?config.sink.sink_type,
        interval_ms = config.interval_ms,
        "Writer created from config"
    );
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_log_sink() {
        let sink = create_sink("logger", &SinkConfig::of(SinkType::Log))
            .await
            .unwrap();
        assert!(matches!(sink, ConfiguredSink::Log(_)));
        assert_eq!(sink.name(), "logger");
    }

    #[tokio::test]
    async fn test_file_sink_requires_path() {
        let result = create_sink("file", &SinkConfig::of(SinkType::File)).await;
        assert!(matches!(result, Err(WriterError::SinkCreation { .. })));
    }

    #[tokio::test]
    async fn test_create_writer_with_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("writer.log");

        let mut config = WriterConfig::new("to_file");
        config.sink = SinkConfig::of(SinkType::File).with_param("path", path.to_string_lossy());

        let writer = create_writer(&config).await.unwrap();
        assert_eq!(writer.name(), "to_file");
        writer.write(b"line one\n").await.unwrap();
        writer.write(b"line two\n").await.unwrap();
        writer.close().await.unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "line one\nline two\n");
    }
}
