//! # Contracts
//!
//! Frozen interface contracts shared by every crate in the workspace: the
//! byte sink trait, the error types and the writer configuration.
//! Business crates depend on this crate only, never on each other's internals.
//!
//! ## Time Model
//! - Flush intervals are wall-clock durations, configured in milliseconds
//! - A coalescing window opens on the first byte and never extends

mod error;
mod sink;
mod writer_config;

pub use error::*;
pub use sink::*;
pub use writer_config::*;
