//! Layered error definitions
//!
//! Categorized by source: config / dataset / range / playback / sink

use thiserror::Error;

use crate::Timestamp;

/// Unified error type
#[derive(Debug, Error)]
pub enum ReplayError {
    // ===== Configuration Errors =====
    /// Manifest parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Manifest validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Dataset Errors =====
    /// Dataset could not be opened; raised before any core operation runs
    #[error("dataset unavailable at '{path}': {message}")]
    DatasetUnavailable { path: String, message: String },

    /// Dataset content violates a source invariant (e.g. unsorted timestamps)
    #[error("invalid dataset: {message}")]
    InvalidDataset { message: String },

    // ===== Range Errors =====
    /// Index outside a source's valid bounds
    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Query time outside the scan source's covered interval
    #[error("time {query} outside covered interval [{start}, {stop})")]
    TimeOutOfRange {
        query: Timestamp,
        start: Timestamp,
        stop: Timestamp,
    },

    // ===== Playback Errors =====
    /// A play loop is already running; the second start is rejected
    #[error("playback already running")]
    PlaybackBusy,

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ReplayError {
    /// Create manifest parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create manifest validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create dataset-unavailable error
    pub fn dataset_unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DatasetUnavailable {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create invalid-dataset error
    pub fn invalid_dataset(message: impl Into<String>) -> Self {
        Self::InvalidDataset {
            message: message.into(),
        }
    }

    /// Create index range error
    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::OutOfRange { what, index, len }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
