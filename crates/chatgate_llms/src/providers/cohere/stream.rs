//! Cohere streaming support
//!
//! Event-stream payloads carry a `type`:
//! - `content-delta` with text at `delta.message.content.text`
//! - `message-end` to end the stream
//! - `message-start`, `content-start`, `content-end` carry no text

use reqwest::Response;

use super::types::CohereStreamEvent;
use crate::stream::{Chunk, ChunkParser, EventStreamDecoder, drive};
use crate::config::AdapterConfig;
use crate::transport::{Deadline, byte_stream};
use crate::types::FragmentStream;

pub struct CohereChunks;

impl ChunkParser for CohereChunks {
    type Payload = CohereStreamEvent;

    fn interpret(&self, event: CohereStreamEvent) -> Chunk {
        match event.type_.as_str() {
            "content-delta" => event
                .delta
                .and_then(|d| d.message)
                .and_then(|m| m.content)
                .and_then(|c| c.text)
                .map(Chunk::text)
                .unwrap_or_else(Chunk::skip),
            "message-end" => match event.delta.and_then(|d| d.finish_reason) {
                Some(reason) if reason == "ERROR" => Chunk::error("generation ended with an error"),
                _ => Chunk::done(),
            },
            _ => Chunk::skip(),
        }
    }
}

pub fn create_stream(
    config: &AdapterConfig,
    deadline: Deadline,
    response: Response,
) -> FragmentStream {
    let body = byte_stream(deadline.backend(), response);
    drive(deadline, body, EventStreamDecoder::new(CohereChunks), config.api_key.clone())
}
