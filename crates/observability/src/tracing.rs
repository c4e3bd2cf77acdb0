//! Span helpers shared by the gateway crates

/// Create a span for one outbound LLM call.
///
/// Declares the fields that [`record_duration`] and [`record_error`] fill in,
/// so they can be recorded after the call completes.
///
/// # Example
///
/// ```rust
/// use chatgate_observability::llm_call_span;
///
/// let span = llm_call_span!("generate", "ollama", "llama3.2", "3f1c");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! llm_call_span {
    ($operation:expr, $backend:expr, $model:expr, $request_id:expr) => {
        tracing::info_span!(
            "llm.call",
            operation = $operation,
            backend = $backend,
            model = $model,
            request.id = $request_id,
            duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span
///
/// Marks the span as failed, stores the message, and emits a `warn` event.
///
/// # Example
///
/// ```rust
/// use chatgate_observability::record_error;
///
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "boom");
/// record_error(&err);
/// ```
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::warn!(error = %error, "Operation failed");
}

/// Record latency/duration on the current span
///
/// # Example
///
/// ```rust
/// use chatgate_observability::record_duration;
/// use std::time::Instant;
///
/// let start = Instant::now();
/// record_duration("duration_ms", start.elapsed());
/// ```
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
