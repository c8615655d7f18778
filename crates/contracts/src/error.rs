//! Layered error definitions
//!
//! Categorized by source: config / sink

use std::io;

use thiserror::Error;

/// Unified error type for configuration and setup
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error raised by a sink while a buffer is drained into it.
///
/// `Clone` because the most recent one is handed out as a snapshot to every
/// writer caller until it is replaced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// Sink rejected the write
    #[error("sink '{sink_name}' write error: {message}")]
    Write { sink_name: String, message: String },

    /// Underlying IO failure
    #[error("sink '{sink_name}' io error ({kind:?}): {message}")]
    Io {
        sink_name: String,
        kind: io::ErrorKind,
        message: String,
    },

    /// Sink accepted fewer bytes than it was given
    #[error("sink '{sink_name}' short write: {written} of {expected} bytes")]
    ShortWrite {
        sink_name: String,
        written: usize,
        expected: usize,
    },
}

impl SinkError {
    /// Create sink write error
    pub fn write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }

    /// Capture an IO error raised by the named sink
    pub fn io(sink_name: impl Into<String>, err: &io::Error) -> Self {
        Self::Io {
            sink_name: sink_name.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    /// Name of the sink that failed
    pub fn sink_name(&self) -> &str {
        match self {
            Self::Write { sink_name, .. }
            | Self::Io { sink_name, .. }
            | Self::ShortWrite { sink_name, .. } => sink_name,
        }
    }
}
