//! Shared HTTP plumbing: deadlines, status handling, body decoding and
//! call instrumentation.

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use chatgate_observability::{record_duration, record_error};
use futures::stream::{Stream, StreamExt};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::time::Instant;
use tracing::{Instrument, Span, info};

use crate::config::AdapterConfig;
use crate::error::{Error, Result, excerpt, redact};
use crate::types::Backend;

/// Phase names used in timeout messages.
pub const PHASE_HEALTH: &str = "health check";
pub const PHASE_GENERATE: &str = "generation";
pub const PHASE_STREAM: &str = "stream";

/// Absolute deadline for one outbound call.
///
/// Work raced against the deadline is dropped when it expires, which aborts
/// the in-flight request and releases its connection.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    backend: Backend,
    phase: &'static str,
    started: Instant,
    at: Instant,
}

impl Deadline {
    pub fn new(backend: Backend, phase: &'static str, budget: Duration) -> Self {
        let started = Instant::now();
        Self {
            backend,
            phase,
            started,
            at: started + budget,
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn phase(&self) -> &'static str {
        self.phase
    }

    /// Await `fut`, or fail with a timeout error once the deadline passes.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output> {
        tokio::time::timeout_at(self.at, fut)
            .await
            .map_err(|_| Error::Timeout {
                backend: self.backend,
                phase: self.phase,
                elapsed: self.started.elapsed(),
            })
    }
}

/// Extracts the most specific error text from a backend's error body.
pub type ErrorExtractor = fn(&Value) -> Option<String>;

/// Send `request` under `deadline` and turn non-success statuses into
/// [`Error::Upstream`].
pub async fn send(
    config: &AdapterConfig,
    request: RequestBuilder,
    deadline: &Deadline,
    extract: ErrorExtractor,
) -> Result<Response> {
    let backend = config.backend;
    let response = deadline
        .run(request.send())
        .await?
        .map_err(|e| Error::transport(backend, e))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = deadline
        .run(response.text())
        .await?
        .unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .as_ref()
        .and_then(extract)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("no response body")
                    .to_string()
            } else {
                excerpt(&body)
            }
        });

    Err(Error::Upstream {
        backend,
        status: status.as_u16(),
        message: redact(&message, config.api_key.as_deref()),
    })
}

/// Read and decode a JSON body under `deadline`.
pub async fn read_json<T: DeserializeOwned>(
    backend: Backend,
    response: Response,
    deadline: &Deadline,
) -> Result<T> {
    let body = deadline
        .run(response.bytes())
        .await?
        .map_err(|e| Error::transport(backend, e))?;
    serde_json::from_slice(&body).map_err(|e| Error::malformed(backend, e.to_string()))
}

/// Recognizes the body a healthy backend returns from its probe endpoint.
pub type BodyCheck = fn(&Value) -> bool;

/// Liveness probe: true only for a success status whose JSON body passes
/// `check`, all within `timeout`.
pub async fn probe(
    backend: Backend,
    request: RequestBuilder,
    timeout: Duration,
    check: BodyCheck,
) -> bool {
    let deadline = Deadline::new(backend, PHASE_HEALTH, timeout);
    match probe_body(backend, request, &deadline).await {
        Ok(body) if check(&body) => true,
        Ok(_) => {
            tracing::debug!(backend = %backend, "Health probe returned an unexpected body");
            false
        }
        Err(e) => {
            tracing::debug!(backend = %backend, error = %e, "Health probe failed");
            false
        }
    }
}

async fn probe_body(
    backend: Backend,
    request: RequestBuilder,
    deadline: &Deadline,
) -> Result<Value> {
    let response = deadline
        .run(request.send())
        .await?
        .map_err(|e| Error::transport(backend, e))?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::Upstream {
            backend,
            status: status.as_u16(),
            message: status.canonical_reason().unwrap_or("no reason").to_string(),
        });
    }
    read_json(backend, response, deadline).await
}

/// Response body as a stream of byte chunks with normalized errors.
pub fn byte_stream(
    backend: Backend,
    response: Response,
) -> impl Stream<Item = Result<Bytes>> + Send + 'static {
    response
        .bytes_stream()
        .map(move |chunk| chunk.map_err(|e| Error::transport(backend, e)))
}

/// Span for one backend call.
pub fn call_span(operation: &str, config: &AdapterConfig) -> Span {
    let request_id = uuid::Uuid::new_v4().to_string();
    chatgate_observability::llm_call_span!(
        operation,
        config.backend.as_str(),
        config.model.as_str(),
        request_id.as_str()
    )
}

/// Run `fut` inside `span`, logging its duration and outcome.
pub async fn observed<T, F>(span: Span, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    async move {
        let started = std::time::Instant::now();
        let result = fut.await;
        let elapsed = started.elapsed();

        record_duration("duration_ms", elapsed);
        match &result {
            Ok(_) => info!(duration_ms = elapsed.as_millis() as u64, "Backend call succeeded"),
            Err(e) => record_error(e),
        }
        result
    }
    .instrument(span)
    .await
}
