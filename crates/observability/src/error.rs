//! Error types for the tracing bootstrap

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObservabilityError {
    /// A global subscriber is already installed, or installing it failed
    #[error("Failed to install tracing subscriber: {0}")]
    InitFailed(String),

    /// The OTLP span exporter could not be built
    #[error("Failed to build OTLP exporter for {endpoint}: {message}")]
    Exporter { endpoint: String, message: String },

    #[error("Invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("Unknown log format '{0}' (expected text or json)")]
    UnknownLogFormat(String),
}
