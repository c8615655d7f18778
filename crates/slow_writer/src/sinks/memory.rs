//! MemorySink - records every drain in memory

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use contracts::{ByteSink, SinkError};
use tokio::time::Instant;

/// One sink call that succeeded
#[derive(Debug, Clone)]
pub struct Drain {
    /// When the sink accepted the bytes
    pub at: Instant,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
struct Recorded {
    drains: Vec<Drain>,
    calls: usize,
}

/// In-memory sink shared between its clones
///
/// Hand one clone to the writer and keep another to inspect what was
/// drained. Failures can be injected on chosen call numbers (1-based),
/// and a delay can simulate a slow destination.
#[derive(Debug, Clone)]
pub struct MemorySink {
    name: String,
    recorded: Arc<Mutex<Recorded>>,
    fail_on: HashSet<usize>,
    delay: Option<Duration>,
}

impl MemorySink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            recorded: Arc::default(),
            fail_on: HashSet::new(),
            delay: None,
        }
    }

    /// Make the `n`-th call (1-based) fail
    pub fn fail_on_call(mut self, n: usize) -> Self {
        self.fail_on.insert(n);
        self
    }

    /// Sleep this long inside every call
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Successful drains in arrival order
    pub fn drains(&self) -> Vec<Drain> {
        self.lock().drains.clone()
    }

    /// Number of calls, failed ones included
    pub fn call_count(&self) -> usize {
        self.lock().calls
    }

    /// Concatenation of every successful drain
    pub fn contents(&self) -> Vec<u8> {
        self.lock()
            .drains
            .iter()
            .flat_map(|d| d.bytes.iter().copied())
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ByteSink for MemorySink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut recorded = self.lock();
        recorded.calls += 1;
        let call = recorded.calls;
        if self.fail_on.contains(&call) {
            return Err(SinkError::write(
                &self.name,
                format!("injected failure on call {call}"),
            ));
        }
        recorded.drains.push(Drain {
            at: Instant::now(),
            bytes: Bytes::copy_from_slice(bytes),
        });
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_drains_across_clones() {
        let observer = MemorySink::new("mem");
        let mut sink = observer.clone();

        sink.write(b"ab").await.unwrap();
        sink.write(b"cd").await.unwrap();

        assert_eq!(observer.call_count(), 2);
        assert_eq!(observer.drains().len(), 2);
        assert_eq!(observer.contents(), b"abcd");
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let observer = MemorySink::new("mem").fail_on_call(2);
        let mut sink = observer.clone();

        assert!(sink.write(b"1").await.is_ok());
        assert!(sink.write(b"2").await.is_err());
        assert!(sink.write(b"3").await.is_ok());

        assert_eq!(observer.call_count(), 3);
        assert_eq!(observer.contents(), b"13");
    }
}
