//! Sink implementations
//!
//! Contains IoSink, LogSink, and MemorySink.

mod io;
mod log;
mod memory;

pub use self::io::IoSink;
pub use self::log::LogSink;
pub use self::memory::{Drain, MemorySink};
