//! Backend-independent types shared by every adapter.

use std::pin::Pin;
use std::str::FromStr;
use std::task::{Context, Poll};
use std::time::Instant;

use futures::stream::{BoxStream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{Span, debug, info, warn};

use crate::config::AdapterConfig;
use crate::error::{Error, Result};

/// Identifies one of the supported generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Locally hosted Ollama server
    Ollama,
    /// Cohere chat API (v2)
    Cohere,
    /// Anthropic, through its chat-completions compatible endpoint
    Anthropic,
    /// Google Gemini generateContent API
    Gemini,
}

impl Backend {
    /// All backends, in registry order.
    pub const ALL: [Backend; 4] = [
        Backend::Ollama,
        Backend::Cohere,
        Backend::Anthropic,
        Backend::Gemini,
    ];

    /// Stable identifier used in config, logs and status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Ollama => "ollama",
            Backend::Cohere => "cohere",
            Backend::Anthropic => "anthropic",
            Backend::Gemini => "gemini",
        }
    }

    /// Human-readable name; every error message starts with it.
    pub fn label(&self) -> &'static str {
        match self {
            Backend::Ollama => "Ollama",
            Backend::Cohere => "Cohere",
            Backend::Anthropic => "Anthropic",
            Backend::Gemini => "Gemini",
        }
    }

    /// Prefix for this backend's environment variables.
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Backend::Ollama => "OLLAMA",
            Backend::Cohere => "COHERE",
            Backend::Anthropic => "ANTHROPIC",
            Backend::Gemini => "GEMINI",
        }
    }

    /// Hosted backends cannot be called without a credential.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Backend::Ollama)
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" | "local" => Ok(Backend::Ollama),
            "cohere" => Ok(Backend::Cohere),
            "anthropic" | "claude" => Ok(Backend::Anthropic),
            "gemini" | "google" => Ok(Backend::Gemini),
            _ => Err(Error::BackendNotFound(s.to_string())),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who sent a prior conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One prior turn of the conversation, in dialogue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(TurnRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, content)
    }
}

/// Last known outcome of a liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Liveness {
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
}

impl From<bool> for Liveness {
    fn from(healthy: bool) -> Self {
        if healthy {
            Liveness::Healthy
        } else {
            Liveness::Unhealthy
        }
    }
}

/// Descriptive status record for one adapter.
///
/// Reports whether a credential is configured, never the credential itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendStatus {
    pub backend: Backend,
    pub enabled: bool,
    pub healthy: bool,
    pub liveness: Liveness,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub api_key_configured: bool,
    pub health_ttl_secs: u64,
}

impl BackendStatus {
    pub fn new(config: &AdapterConfig, healthy: bool, liveness: Liveness) -> Self {
        Self {
            backend: config.backend,
            enabled: config.enabled,
            healthy,
            liveness,
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            api_key_configured: config.has_api_key(),
            health_ttl_secs: config.health_ttl.as_secs(),
        }
    }
}

/// Lazy, finite sequence of generated text fragments.
///
/// Fragments arrive in emission order. The sequence ends on the backend's
/// completion signal, on end of body, or after the first error. Dropping the
/// stream early drops the underlying response body, closing the connection.
///
/// The span current at construction is kept so the stream's outcome is
/// logged under the call that opened it.
pub struct FragmentStream {
    inner: BoxStream<'static, Result<String>>,
    backend: Backend,
    span: Span,
    started: Instant,
    fragments: usize,
    finished: bool,
}

impl FragmentStream {
    pub fn new(backend: Backend, inner: BoxStream<'static, Result<String>>) -> Self {
        Self {
            inner,
            backend,
            span: Span::current(),
            started: Instant::now(),
            fragments: 0,
            finished: false,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Number of fragments yielded so far.
    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Drain the stream and concatenate every fragment.
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

impl Stream for FragmentStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        match this.inner.poll_next_unpin(cx) {
            Poll::Ready(Some(Ok(fragment))) => {
                this.fragments += 1;
                Poll::Ready(Some(Ok(fragment)))
            }
            Poll::Ready(Some(Err(e))) => {
                if !this.finished {
                    this.finished = true;
                    warn!(
                        parent: &this.span,
                        backend = %this.backend,
                        fragments = this.fragments,
                        duration_ms = this.started.elapsed().as_millis() as u64,
                        error = %e,
                        "Stream failed"
                    );
                }
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                if !this.finished {
                    this.finished = true;
                    info!(
                        parent: &this.span,
                        backend = %this.backend,
                        fragments = this.fragments,
                        duration_ms = this.started.elapsed().as_millis() as u64,
                        "Stream completed"
                    );
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Drop for FragmentStream {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                parent: &self.span,
                backend = %self.backend,
                fragments = self.fragments,
                duration_ms = self.started.elapsed().as_millis() as u64,
                "Stream dropped before completion"
            );
        }
    }
}

impl std::fmt::Debug for FragmentStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentStream")
            .field("backend", &self.backend)
            .field("fragments", &self.fragments)
            .field("finished", &self.finished)
            .finish()
    }
}
