//! Gemini streaming support
//!
//! The body is a sequence of response objects, either one per line or as
//! the elements of a pretty-printed JSON array. Text is the concatenation
//! of `candidates[0].content.parts[*].text` and a `finishReason` on the
//! candidate ends the stream.

use reqwest::Response;

use super::types::GeminiResponse;
use crate::stream::{Chunk, ChunkParser, ObjectStreamDecoder, drive};
use crate::config::AdapterConfig;
use crate::transport::{Deadline, byte_stream};
use crate::types::FragmentStream;

pub struct GeminiChunks;

impl ChunkParser for GeminiChunks {
    type Payload = GeminiResponse;

    fn interpret(&self, resp: GeminiResponse) -> Chunk {
        if let Some(error) = resp.error {
            return Chunk::error(error.message.unwrap_or_else(|| "stream error".to_string()));
        }
        let Some(candidate) = resp.candidates.first() else {
            return match resp.prompt_feedback.and_then(|f| f.block_reason) {
                Some(reason) => Chunk::error(format!("prompt blocked ({reason})")),
                None => Chunk::skip(),
            };
        };

        Chunk {
            text: candidate.text(),
            done: candidate.finish_reason.is_some(),
            error: None,
        }
    }
}

pub fn create_stream(
    config: &AdapterConfig,
    deadline: Deadline,
    response: Response,
) -> FragmentStream {
    let body = byte_stream(deadline.backend(), response);
    drive(deadline, body, ObjectStreamDecoder::new(GeminiChunks), config.api_key.clone())
}
