//! Incremental decoding of streamed response bodies.
//!
//! Three framings are supported: event-stream (`data: {...}` lines),
//! newline-delimited JSON, and a sequence of JSON objects in any layout
//! (one per line or spread across lines inside a JSON array). All of them
//! buffer bytes until a payload is complete, skip payloads that do not
//! parse, and stop at the backend's completion signal. What a parsed
//! payload means is left to a [`ChunkParser`].

mod driver;
mod lines;
mod ndjson;
mod objects;
mod sse;

pub use driver::drive;
pub use lines::LineBuffer;
pub use ndjson::NdjsonDecoder;
pub use objects::ObjectStreamDecoder;
pub use sse::EventStreamDecoder;

use serde::de::DeserializeOwned;

/// Output of a decoder step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A non-empty piece of generated text
    Fragment(String),
    /// The backend signaled completion
    Done,
    /// The backend reported an error inside the stream
    Failed(String),
}

/// What a single parsed payload contributes to the stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    pub text: Option<String>,
    pub done: bool,
    pub error: Option<String>,
}

impl Chunk {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn done() -> Self {
        Self {
            done: true,
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    /// A payload carrying nothing of interest.
    pub fn skip() -> Self {
        Self::default()
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }
}

/// Backend-specific interpretation of stream payloads.
pub trait ChunkParser: Send + 'static {
    type Payload: DeserializeOwned;

    fn interpret(&self, payload: Self::Payload) -> Chunk;

    /// Raw `data:` values that end the stream without being parsed.
    fn is_sentinel(&self, _data: &str) -> bool {
        false
    }
}

/// Incremental bytes-to-fragments state machine.
pub trait Decoder: Send {
    /// Consume one network read.
    fn feed(&mut self, bytes: &[u8]) -> Vec<Decoded>;

    /// End of body: attempt the unterminated remainder.
    fn finish(&mut self) -> Vec<Decoded>;

    /// Payloads recognized so far, sentinels included.
    fn payloads(&self) -> usize;
}

/// Append what `chunk` contributes to `out`. Returns whether the stream
/// is over.
fn emit(chunk: Chunk, out: &mut Vec<Decoded>) -> bool {
    if let Some(message) = chunk.error {
        out.push(Decoded::Failed(message));
        return true;
    }
    if let Some(text) = chunk.text.filter(|t| !t.is_empty()) {
        out.push(Decoded::Fragment(text));
    }
    if chunk.done {
        out.push(Decoded::Done);
    }
    chunk.done
}

/// Parse one JSON payload, logging and skipping anything unparseable.
///
/// Returns `None` for a skipped payload, otherwise whether the stream is over.
fn parse_payload<P: ChunkParser>(
    parser: &P,
    data: &str,
    out: &mut Vec<Decoded>,
) -> Option<bool> {
    match serde_json::from_str::<P::Payload>(data) {
        Ok(payload) => Some(emit(parser.interpret(payload), out)),
        Err(e) => {
            tracing::trace!(error = %e, "Skipping unparseable stream payload");
            None
        }
    }
}
