//! Anthropic streaming support
//!
//! Chat-completions event-stream format:
//! - `data: {"choices":[{"delta":{"content":"..."}}]}` for text deltas
//! - `data: {"error":{"message":"..."}}` if generation fails midway
//! - `data: [DONE]` to signal stream end

use reqwest::Response;

use super::types::AnthropicStreamChunk;
use crate::stream::{Chunk, ChunkParser, EventStreamDecoder, drive};
use crate::config::AdapterConfig;
use crate::transport::{Deadline, byte_stream};
use crate::types::FragmentStream;

pub struct AnthropicChunks;

impl ChunkParser for AnthropicChunks {
    type Payload = AnthropicStreamChunk;

    fn interpret(&self, chunk: AnthropicStreamChunk) -> Chunk {
        if let Some(error) = chunk.error {
            return Chunk::error(error.message.unwrap_or_else(|| "stream error".to_string()));
        }
        chunk
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.delta)
            .and_then(|d| d.content)
            .map(Chunk::text)
            .unwrap_or_else(Chunk::skip)
    }

    fn is_sentinel(&self, data: &str) -> bool {
        data == "[DONE]"
    }
}

pub fn create_stream(
    config: &AdapterConfig,
    deadline: Deadline,
    response: Response,
) -> FragmentStream {
    let body = byte_stream(deadline.backend(), response);
    drive(deadline, body, EventStreamDecoder::new(AnthropicChunks), config.api_key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{Decoded, Decoder};

    #[test]
    fn test_deltas_until_done_sentinel() {
        let mut decoder = EventStreamDecoder::new(AnthropicChunks);
        let mut out = decoder.feed(
            b"data: {\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n\
              data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\"2+2\"}}]}\n\n\
              data: {\"choices\":[{\"index\":0,\"delta\":{\"content\":\" is 4\"},\"finish_reason\":\"stop\"}]}\n\n",
        );
        out.extend(decoder.feed(b"data: [DONE]\n\n"));

        assert_eq!(
            out,
            vec![
                Decoded::Fragment("2+2".into()),
                Decoded::Fragment(" is 4".into()),
                Decoded::Done,
            ]
        );
    }

    #[test]
    fn test_error_payload() {
        let mut decoder = EventStreamDecoder::new(AnthropicChunks);
        let out = decoder.feed(b"data: {\"error\":{\"type\":\"overloaded_error\",\"message\":\"Overloaded\"}}\n");
        assert_eq!(out, vec![Decoded::Failed("Overloaded".into())]);
    }
}
