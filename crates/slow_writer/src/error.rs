//! SlowWriter error types

use contracts::SinkError;
use thiserror::Error;

/// Errors surfaced by a slow writer to its callers
#[derive(Debug, Error)]
pub enum WriterError {
    /// The scheduler loop is gone; nothing can be handed to it anymore
    #[error("writer '{name}' is closed")]
    Closed { name: String },

    /// Some drain since the writer was created failed
    #[error("drain failed: {0}")]
    Sink(#[from] SinkError),

    /// The loop task panicked or was cancelled
    #[error("scheduler loop of writer '{name}' aborted: {message}")]
    LoopAborted { name: String, message: String },

    /// Sink creation error
    #[error("failed to create sink for writer '{name}': {message}")]
    SinkCreation { name: String, message: String },
}

impl WriterError {
    /// Create a closed error
    pub fn closed(name: impl Into<String>) -> Self {
        Self::Closed { name: name.into() }
    }

    /// Create a sink creation error
    pub fn sink_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
