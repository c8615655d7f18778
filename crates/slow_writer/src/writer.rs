//! SlowWriter - public handle to a running scheduler loop

use std::sync::Arc;
use std::time::Duration;

use contracts::{ByteSink, ClosePolicy, SinkError, WriterConfig};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, instrument};

use crate::error::WriterError;
use crate::metrics::WriterMetrics;
use crate::scheduler::{Command, SchedulerLoop};

/// Construction options for a writer
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Writer name (used for logging/metrics)
    pub name: String,
    /// Coalescing window, measured from the first buffered byte
    pub interval: Duration,
    /// What happens to undrained bytes on close
    pub close_policy: ClosePolicy,
}

impl WriterOptions {
    pub fn new(interval: Duration) -> Self {
        Self {
            name: "slow_writer".to_string(),
            interval,
            close_policy: ClosePolicy::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_close_policy(mut self, close_policy: ClosePolicy) -> Self {
        self.close_policy = close_policy;
        self
    }
}

impl From<&WriterConfig> for WriterOptions {
    fn from(config: &WriterConfig) -> Self {
        Self {
            name: config.name.clone(),
            interval: config.interval(),
            close_policy: config.close_policy,
        }
    }
}

/// Outcome of a write once the loop has taken the data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteAck {
    /// Bytes accepted into the buffer, always the full input
    pub accepted: usize,
    /// Last drain error known to the loop when it accepted the data.
    ///
    /// May be stale: it belongs to some earlier drain, not to this write.
    pub last_error: Option<SinkError>,
}

impl WriteAck {
    /// Read the ack as an `(n, err)` pair collapsed into a `Result`
    pub fn into_result(self) -> Result<usize, SinkError> {
        match self.last_error {
            Some(e) => Err(e),
            None => Ok(self.accepted),
        }
    }
}

/// Cloneable entry point for concurrent callers
///
/// Every call is a rendezvous: it returns only after the loop has picked the
/// message up, so calls from one caller are observed in issue order.
#[derive(Debug, Clone)]
pub struct WriterHandle {
    name: Arc<str>,
    tx: mpsc::Sender<Command>,
}

impl WriterHandle {
    /// Get writer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue `data` for the next drain.
    ///
    /// Waits until the loop has appended it to the buffer, not until it is drained.
    pub async fn write(&self, data: &[u8]) -> Result<WriteAck, WriterError> {
        let (ack, ack_rx) = oneshot::channel();
        let command = Command::Write {
            data: data.to_vec(),
            ack,
        };
        self.tx.send(command).await.map_err(|_| self.closed())?;
        let last_error = ack_rx.await.map_err(|_| self.closed())?;

        Ok(WriteAck {
            accepted: data.len(),
            last_error,
        })
    }

    /// Request an immediate drain.
    ///
    /// Returns once the loop has accepted the request; the drain itself runs after.
    pub async fn flush(&self) -> Result<(), WriterError> {
        let (ack, ack_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush { ack })
            .await
            .map_err(|_| self.closed())?;
        ack_rx.await.map_err(|_| self.closed())
    }

    /// Blocking variant of [`write`](Self::write) for plain OS threads.
    ///
    /// # Panics
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_write(&self, data: &[u8]) -> Result<WriteAck, WriterError> {
        let (ack, ack_rx) = oneshot::channel();
        let command = Command::Write {
            data: data.to_vec(),
            ack,
        };
        self.tx.blocking_send(command).map_err(|_| self.closed())?;
        let last_error = ack_rx.blocking_recv().map_err(|_| self.closed())?;

        Ok(WriteAck {
            accepted: data.len(),
            last_error,
        })
    }

    /// Blocking variant of [`flush`](Self::flush) for plain OS threads.
    ///
    /// # Panics
    /// Panics when called from within an asynchronous execution context.
    pub fn blocking_flush(&self) -> Result<(), WriterError> {
        let (ack, ack_rx) = oneshot::channel();
        self.tx
            .blocking_send(Command::Flush { ack })
            .map_err(|_| self.closed())?;
        ack_rx.blocking_recv().map_err(|_| self.closed())
    }

    fn closed(&self) -> WriterError {
        WriterError::closed(&*self.name)
    }
}

/// Rate-limited buffering writer in front of a [`ByteSink`]
///
/// Owns the scheduler loop task. Dropping it without [`close`](Self::close)
/// lets the loop run until every [`WriterHandle`] is gone.
pub struct SlowWriter {
    handle: WriterHandle,
    metrics: Arc<WriterMetrics>,
    task: JoinHandle<Option<SinkError>>,
}

impl SlowWriter {
    /// Start a writer draining into `sink` at most once per `interval`.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn<S: ByteSink + Send + 'static>(sink: S, interval: Duration) -> Self {
        Self::with_options(sink, WriterOptions::new(interval))
    }

    /// Start a writer with explicit options
    pub fn with_options<S: ByteSink + Send + 'static>(sink: S, options: WriterOptions) -> Self {
        // Capacity 1 plus the per-command ack gives rendezvous semantics.
        let (tx, rx) = mpsc::channel(1);
        let metrics = Arc::new(WriterMetrics::new());

        let scheduler = SchedulerLoop::new(
            options.name.clone(),
            sink,
            rx,
            options.interval,
            options.close_policy,
            Arc::clone(&metrics),
        );
        let task = tokio::spawn(scheduler.run());

        debug!(
            writer = %options.name,
            interval_ms = options.interval.as_millis() as u64,
            close_policy = ?options.close_policy,
            "SlowWriter spawned"
        );

        Self {
            handle: WriterHandle {
                name: Arc::from(options.name),
                tx,
            },
            metrics,
            task,
        }
    }

    /// Get writer name
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<WriterMetrics> {
        &self.metrics
    }

    /// Cloneable handle for other callers
    pub fn handle(&self) -> WriterHandle {
        self.handle.clone()
    }

    /// See [`WriterHandle::write`]
    pub async fn write(&self, data: &[u8]) -> Result<WriteAck, WriterError> {
        self.handle.write(data).await
    }

    /// See [`WriterHandle::flush`]
    pub async fn flush(&self) -> Result<(), WriterError> {
        self.handle.flush().await
    }

    /// Stop the loop and wait for it to finish.
    ///
    /// Returns the Last Error of the writer's lifetime, if any drain failed.
    /// Outstanding handles get [`WriterError::Closed`] afterwards.
    #[instrument(name = "slow_writer_close", skip(self), fields(writer = %self.handle.name))]
    pub async fn close(self) -> Result<(), WriterError> {
        let Self { handle, task, .. } = self;
        let name = handle.name().to_string();

        if handle.tx.send(Command::Close).await.is_err() {
            debug!(writer = %name, "Scheduler loop already stopped");
        }
        drop(handle);

        match task.await {
            Ok(None) => Ok(()),
            Ok(Some(last_error)) => Err(WriterError::Sink(last_error)),
            Err(e) => {
                error!(writer = %name, error = ?e, "Scheduler loop panicked");
                Err(WriterError::LoopAborted {
                    name,
                    message: e.to_string(),
                })
            }
        }
    }
}
