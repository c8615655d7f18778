//! ByteSink trait - the destination a slow writer drains into
//!
//! Defines the abstract interface for sinks.

use crate::SinkError;

/// Byte output trait
///
/// A drain hands the sink the whole accumulated buffer in a single call.
/// Returning `Ok(n)` with `n < bytes.len()` counts as a short write.
#[trait_variant::make(ByteSink: Send)]
pub trait LocalByteSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write the drained bytes, returning how many were accepted
    ///
    /// # Errors
    /// Returns write error (should include the sink name)
    async fn write(&mut self, bytes: &[u8]) -> Result<usize, SinkError>;
}

/// What caused a buffer to be drained into its sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrainTrigger {
    /// The coalescing window elapsed
    Timer,
    /// A caller asked for an explicit flush
    Flush,
    /// Final drain while the writer shuts down
    Close,
}

impl DrainTrigger {
    /// Stable label used in logs and metrics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timer => "timer",
            Self::Flush => "flush",
            Self::Close => "close",
        }
    }
}

impl std::fmt::Display for DrainTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
