//! Writer metrics for observability

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// In-process counters for a single writer
#[derive(Debug, Default)]
pub struct WriterMetrics {
    /// Bytes currently waiting in the buffer
    buffered_bytes: AtomicUsize,
    /// Accepted write calls
    write_count: AtomicU64,
    /// Total bytes accepted
    bytes_accepted: AtomicU64,
    /// Explicit flush requests, including idle no-ops
    flush_requests: AtomicU64,
    /// Successful drains
    drain_count: AtomicU64,
    /// Bytes handed to the sink by successful drains
    bytes_drained: AtomicU64,
    /// Failed drains
    failure_count: AtomicU64,
    /// Bytes dropped on close
    bytes_discarded: AtomicU64,
}

impl WriterMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffered_bytes(&self) -> usize {
        self.buffered_bytes.load(Ordering::Relaxed)
    }

    pub fn set_buffered_bytes(&self, len: usize) {
        self.buffered_bytes.store(len, Ordering::Relaxed);
    }

    pub fn write_count(&self) -> u64 {
        self.write_count.load(Ordering::Relaxed)
    }

    /// Count one accepted write of `bytes` bytes
    pub fn inc_write(&self, bytes: usize) {
        self.write_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_accepted.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn bytes_accepted(&self) -> u64 {
        self.bytes_accepted.load(Ordering::Relaxed)
    }

    pub fn flush_requests(&self) -> u64 {
        self.flush_requests.load(Ordering::Relaxed)
    }

    pub fn inc_flush_requests(&self) {
        self.flush_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn drain_count(&self) -> u64 {
        self.drain_count.load(Ordering::Relaxed)
    }

    /// Count one successful drain of `bytes` bytes
    pub fn inc_drain(&self, bytes: usize) {
        self.drain_count.fetch_add(1, Ordering::Relaxed);
        self.bytes_drained.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn bytes_drained(&self) -> u64 {
        self.bytes_drained.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count.load(Ordering::Relaxed)
    }

    pub fn inc_failure_count(&self) {
        self.failure_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_discarded(&self) -> u64 {
        self.bytes_discarded.load(Ordering::Relaxed)
    }

    pub fn add_discarded(&self, bytes: usize) {
        self.bytes_discarded.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            buffered_bytes: self.buffered_bytes(),
            write_count: self.write_count(),
            bytes_accepted: self.bytes_accepted(),
            flush_requests: self.flush_requests(),
            drain_count: self.drain_count(),
            bytes_drained: self.bytes_drained(),
            failure_count: self.failure_count(),
            bytes_discarded: self.bytes_discarded(),
        }
    }
}

/// Snapshot of writer metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub buffered_bytes: usize,
    pub write_count: u64,
    pub bytes_accepted: u64,
    pub flush_requests: u64,
    pub drain_count: u64,
    pub bytes_drained: u64,
    pub failure_count: u64,
    pub bytes_discarded: u64,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "writes={} ({} B), flushes={}, drains={} ({} B), failures={}, buffered={} B, discarded={} B",
            self.write_count,
            self.bytes_accepted,
            self.flush_requests,
            self.drain_count,
            self.bytes_drained,
            self.failure_count,
            self.buffered_bytes,
            self.bytes_discarded
        )
    }
}
