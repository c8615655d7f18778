//! IoSink - forwards drains to any tokio `AsyncWrite`

use std::path::Path;

use contracts::{ByteSink, SinkError};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt, Stderr, Stdout};
use tracing::{debug, instrument};

/// Sink over a tokio writer: stdout, a file, a socket half...
///
/// Each drain is written in full and flushed before the call returns.
pub struct IoSink<W> {
    name: String,
    inner: W,
}

impl<W: AsyncWrite + Unpin + Send> IoSink<W> {
    /// Wrap an existing writer
    pub fn new(name: impl Into<String>, inner: W) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }

    /// Borrow the wrapped writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Take the wrapped writer back
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl IoSink<Stdout> {
    pub fn stdout(name: impl Into<String>) -> Self {
        Self::new(name, tokio::io::stdout())
    }
}

impl IoSink<Stderr> {
    pub fn stderr(name: impl Into<String>) -> Self {
        Self::new(name, tokio::io::stderr())
    }
}

impl IoSink<File> {
    /// Open `path` for appending, creating it and its parent directories
    pub async fn create_file(name: impl Into<String>, path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path).await?;
        debug!(path = %path.display(), "File sink opened");
        Ok(Self::new(name, file))
    }
}

impl<W: AsyncWrite + Unpin + Send> ByteSink for IoSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "io_sink_write", skip(self, bytes), fields(sink = %self.name, bytes = bytes.len()))]
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        self.inner
            .write_all(bytes)
            .await
            .map_err(|e| SinkError::io(&self.name, &e))?;
        self.inner
            .flush()
            .await
            .map_err(|e| SinkError::io(&self.name, &e))?;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    #[tokio::test]
    async fn test_io_sink_vec() {
        let mut sink = IoSink::new("vec", Vec::new());
        assert_eq!(sink.write(b"abc").await.unwrap(), 3);
        assert_eq!(sink.write(b"def").await.unwrap(), 3);
        assert_eq!(sink.name(), "vec");
        assert_eq!(sink.into_inner(), b"abcdef");
    }

    #[tokio::test]
    async fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.log");

        let mut sink = IoSink::create_file("file", &path).await.unwrap();
        sink.write(b"first\n").await.unwrap();
        drop(sink);

        // Reopening appends instead of truncating.
        let mut sink = IoSink::create_file("file", &path).await.unwrap();
        sink.write(b"second\n").await.unwrap();
        drop(sink);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    struct BrokenPipe;

    impl AsyncWrite for BrokenPipe {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_io_error_is_captured() {
        let mut sink = IoSink::new("broken", BrokenPipe);
        let err = sink.write(b"x").await.unwrap_err();
        match err {
            SinkError::Io { sink_name, kind, .. } => {
                assert_eq!(sink_name, "broken");
                assert_eq!(kind, std::io::ErrorKind::BrokenPipe);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
