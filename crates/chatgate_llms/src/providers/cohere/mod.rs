//! Cohere chat adapter (v2 API)
//!
//! `POST /v2/chat` with bearer auth. Streaming uses event-stream framing;
//! text arrives in `content-delta` events and `message-end` closes the
//! stream.

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::CohereAdapter;
pub use types::{CohereMessage, CohereRequest};
