//! Scheduler loop - sole owner of the buffer, the timer and the sink
//!
//! States:
//! - Idle: buffer empty, `timer` is `None`
//! - Armed: buffer non-empty, `timer` counts down from the first buffered byte
//!
//! Callers never touch this state; they hand commands over a rendezvous
//! channel and wait for the loop's acknowledgement.

use std::pin::Pin;
use std::sync::Arc;

use contracts::{ByteSink, ClosePolicy, DrainTrigger, SinkError};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Duration, Instant, Sleep};
use tracing::{debug, error, info, instrument, warn};

use crate::metrics::WriterMetrics;

/// Message from a caller into the loop
pub(crate) enum Command {
    /// Append to the buffer; the ack carries the Last Error seen at that moment
    Write {
        data: Vec<u8>,
        ack: oneshot::Sender<Option<SinkError>>,
    },
    /// Drain now; acked on receipt, before the drain runs
    Flush { ack: oneshot::Sender<()> },
    /// Stop the loop
    Close,
}

/// What woke the loop up
enum Event {
    Expired,
    Command(Option<Command>),
}

/// A running coalescing window
struct ArmedTimer {
    sleep: Pin<Box<Sleep>>,
    since: Instant,
}

pub(crate) struct SchedulerLoop<S> {
    name: String,
    sink: S,
    rx: mpsc::Receiver<Command>,
    interval: Duration,
    close_policy: ClosePolicy,
    buffer: Vec<u8>,
    // Some iff buffer is non-empty
    timer: Option<ArmedTimer>,
    last_error: Option<SinkError>,
    metrics: Arc<WriterMetrics>,
}

impl<S: ByteSink> SchedulerLoop<S> {
    pub(crate) fn new(
        name: String,
        sink: S,
        rx: mpsc::Receiver<Command>,
        interval: Duration,
        close_policy: ClosePolicy,
        metrics: Arc<WriterMetrics>,
    ) -> Self {
        Self {
            name,
            sink,
            rx,
            interval,
            close_policy,
            buffer: Vec::new(),
            timer: None,
            last_error: None,
            metrics,
        }
    }

    /// Run until a close command arrives or every sender is dropped.
    ///
    /// Returns the Last Error accumulated over the writer's lifetime.
    #[instrument(
        name = "slow_writer_loop",
        skip(self),
        fields(writer = %self.name, sink = %self.sink.name(), interval_ms = self.interval.as_millis() as u64)
    )]
    pub(crate) async fn run(mut self) -> Option<SinkError> {
        debug!("Scheduler loop started");

        loop {
            match self.next_event().await {
                Event::Expired => self.drain(DrainTrigger::Timer).await,
                Event::Command(Some(Command::Write { data, ack })) => self.accept(data, ack),
                Event::Command(Some(Command::Flush { ack })) => {
                    // A dropped receiver means the caller gave up waiting; the request still stands.
                    let _ = ack.send(());
                    self.metrics.inc_flush_requests();
                    observability::record_flush_request(&self.name);
                    self.drain(DrainTrigger::Flush).await;
                }
                Event::Command(Some(Command::Close)) => {
                    debug!("Close requested");
                    break;
                }
                Event::Command(None) => {
                    debug!("All writer handles dropped");
                    break;
                }
            }
        }

        self.shutdown().await;
        self.last_error
    }

    async fn next_event(&mut self) -> Event {
        match self.timer.as_mut() {
            None => Event::Command(self.rx.recv().await),
            Some(armed) => tokio::select! {
                // Timer first: a steady stream of writes must not push an overdue drain back.
                biased;
                () = armed.sleep.as_mut() => Event::Expired,
                command = self.rx.recv() => Event::Command(command),
            },
        }
    }

    fn accept(&mut self, data: Vec<u8>, ack: oneshot::Sender<Option<SinkError>>) {
        let len = data.len();
        if len > 0 {
            if self.buffer.is_empty() {
                self.arm();
                // First chunk of a window becomes the buffer as-is.
                self.buffer = data;
            } else {
                self.buffer.extend_from_slice(&data);
            }
        }

        self.metrics.inc_write(len);
        self.metrics.set_buffered_bytes(self.buffer.len());
        observability::record_write(&self.name, len);
        observability::record_buffered_bytes(&self.name, self.buffer.len());

        let _ = ack.send(self.last_error.clone());
    }

    /// Open a coalescing window; later writes never move its deadline.
    fn arm(&mut self) {
        self.timer = Some(ArmedTimer {
            sleep: Box::pin(time::sleep(self.interval)),
            since: Instant::now(),
        });
    }

    /// Hand the whole buffer to the sink in one call, then clear it.
    ///
    /// No-op while idle. Failures land in `last_error` and never stop the loop.
    async fn drain(&mut self, trigger: DrainTrigger) {
        // Dropping the timer cancels it, so no stale expiry can follow.
        let Some(armed) = self.timer.take() else {
            return;
        };

        let expected = self.buffer.len();
        let window_ms = armed.since.elapsed().as_secs_f64() * 1000.0;

        let result = match self.sink.write(&self.buffer).await {
            Ok(written) if written < expected => Err(SinkError::ShortWrite {
                sink_name: self.sink.name().to_string(),
                written,
                expected,
            }),
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        };
        self.buffer.clear();
        self.metrics.set_buffered_bytes(0);
        observability::record_buffered_bytes(&self.name, 0);
        observability::record_drain(&self.name, trigger, expected, window_ms, result.is_ok());

        match result {
            Ok(()) => {
                self.metrics.inc_drain(expected);
                debug!(
                    writer = %self.name,
                    trigger = %trigger,
                    bytes = expected,
                    window_ms,
                    "Buffer drained"
                );
            }
            Err(e) => {
                self.metrics.inc_failure_count();
                error!(
                    writer = %self.name,
                    trigger = %trigger,
                    bytes = expected,
                    error = %e,
                    "Drain failed"
                );
                self.last_error = Some(e);
            }
        }
    }

    async fn shutdown(&mut self) {
        match self.close_policy {
            ClosePolicy::Drain => self.drain(DrainTrigger::Close).await,
            ClosePolicy::Discard => {
                if self.timer.take().is_some() {
                    let discarded = self.buffer.len();
                    self.buffer.clear();
                    self.metrics.add_discarded(discarded);
                    self.metrics.set_buffered_bytes(0);
                    observability::record_discarded(&self.name, discarded);
                    warn!(
                        writer = %self.name,
                        bytes = discarded,
                        "Writer closed with undrained data, discarding"
                    );
                }
            }
        }

        info!(
            writer = %self.name,
            failed = self.last_error.is_some(),
            "Scheduler loop stopped"
        );
    }
}
