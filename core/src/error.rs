//! Error types for pistats.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pistats operations.
pub type Result<T> = std::result::Result<T, MonitorError>;

#[derive(Error, Debug)]
pub enum MonitorError {
    /// A metric command could not be spawned or exited non-zero.
    #[error("Failed to collect {metric}: {reason}")]
    Collection { metric: String, reason: String },

    /// Display init or push failure.
    #[error("Display error: {0}")]
    Display(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install signal handler: {0}")]
    Signal(#[source] std::io::Error),
}

impl MonitorError {
    pub fn collection(metric: &str, reason: impl Into<String>) -> Self {
        MonitorError::Collection {
            metric: metric.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors raised by the metric collector.
    pub fn is_collection(&self) -> bool {
        matches!(self, MonitorError::Collection { .. })
    }
}
