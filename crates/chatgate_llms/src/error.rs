//! Normalized, backend-tagged errors.
//!
//! Every failure on the generation path surfaces as an [`Error`] whose
//! message starts with the backend label and never contains a credential.

use std::time::Duration;

use thiserror::Error;

use crate::types::Backend;

/// Longest upstream body excerpt kept in an error message.
const MAX_BODY_EXCERPT: usize = 500;

/// Errors produced by the gateway.
#[derive(Error, Debug)]
pub enum Error {
    /// The adapter is switched off in configuration
    #[error("{} is disabled in configuration", .backend.label())]
    Disabled { backend: Backend },

    /// A hosted backend has no credential configured
    #[error("{} API key is not configured", .backend.label())]
    MissingApiKey { backend: Backend },

    /// The call exceeded its deadline and was aborted
    #[error("{} {phase} timed out after {:.1}s", .backend.label(), .elapsed.as_secs_f64())]
    Timeout {
        backend: Backend,
        phase: &'static str,
        elapsed: Duration,
    },

    /// Connection, DNS or TLS failure
    #[error("{} request failed: {message}", .backend.label())]
    Transport { backend: Backend, message: String },

    /// Non-success HTTP status
    #[error("{} API error ({status}): {message}", .backend.label())]
    Upstream {
        backend: Backend,
        status: u16,
        message: String,
    },

    /// Success status, but the payload lacks an expected field
    #[error("{} returned a malformed response: {detail}", .backend.label())]
    MalformedResponse { backend: Backend, detail: String },

    /// Any other failure, already tagged with the backend label
    #[error("{message}")]
    Other { backend: Backend, message: String },

    /// No adapter registered under the requested identifier
    #[error("Backend not found: {0}")]
    BackendNotFound(String),
}

impl Error {
    /// Wrap a free-form message, tagging it with the backend label.
    ///
    /// Messages that already start with the label are kept verbatim, so
    /// wrapping twice yields the same text.
    pub fn wrap(backend: Backend, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.starts_with(backend.label()) {
            message
        } else {
            format!("{}: {}", backend.label(), message)
        };
        Error::Other { backend, message }
    }

    /// Normalize a reqwest failure. The request URL is stripped because
    /// some backends carry their key in the query string.
    pub fn transport(backend: Backend, err: reqwest::Error) -> Self {
        let err = err.without_url();
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        Error::Transport { backend, message }
    }

    pub fn malformed(backend: Backend, detail: impl Into<String>) -> Self {
        Error::MalformedResponse {
            backend,
            detail: detail.into(),
        }
    }

    /// Backend the error belongs to, if any.
    pub fn backend(&self) -> Option<Backend> {
        match self {
            Error::Disabled { backend }
            | Error::MissingApiKey { backend }
            | Error::Timeout { backend, .. }
            | Error::Transport { backend, .. }
            | Error::Upstream { backend, .. }
            | Error::MalformedResponse { backend, .. }
            | Error::Other { backend, .. } => Some(*backend),
            Error::BackendNotFound(_) => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }

    /// Configuration failures: the call was never attempted.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Disabled { .. } | Error::MissingApiKey { .. })
    }

    /// Whether a caller could reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Timeout { .. } | Error::Transport { .. } => true,
            Error::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Replace every occurrence of `secret` in `text` with `***`.
pub(crate) fn redact(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => text.replace(secret, "***"),
        _ => text.to_string(),
    }
}

/// Cut an upstream body down to a loggable excerpt on a char boundary.
pub(crate) fn excerpt(body: &str) -> String {
    let body = body.trim();
    if body.len() <= MAX_BODY_EXCERPT {
        return body.to_string();
    }
    let mut end = MAX_BODY_EXCERPT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &body[..end])
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, Error>;
