//! LogSink - emits each drain as a tracing event

use contracts::{ByteSink, SinkError};
use tracing::{info, instrument};

const PREVIEW_BYTES: usize = 64;

/// Sink that logs drain summaries for debugging
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn preview(bytes: &[u8]) -> String {
        let end = bytes.len().min(PREVIEW_BYTES);
        let mut preview = String::from_utf8_lossy(&bytes[..end]).into_owned();
        if bytes.len() > PREVIEW_BYTES {
            preview.push('…');
        }
        preview
    }
}

impl ByteSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "log_sink_write", skip(self, bytes), fields(sink = %self.name))]
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        info!(
            sink = %self.name,
            bytes = bytes.len(),
            preview = %Self::preview(bytes),
            "Drain received"
        );
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_sink_write() {
        let mut sink = LogSink::new("test_log");
        assert_eq!(sink.write(b"hello").await.unwrap(), 5);
    }

    #[test]
    fn test_preview_truncates() {
        let long = vec![b'a'; 100];
        let preview = LogSink::preview(&long);
        assert_eq!(preview.chars().count(), PREVIEW_BYTES + 1);
        assert!(preview.ends_with('…'));
        assert_eq!(LogSink::preview(b"short"), "short");
    }

    #[test]
    fn test_log_sink_name() {
        let sink = LogSink::new("my_logger");
        assert_eq!(sink.name(), "my_logger");
    }
}
