//! Ollama streaming support
//!
//! One JSON object per line:
//! - `{"message":{"content":"..."},"done":false}` for text
//! - `{"done":true, ...}` to end the stream
//! - `{"error":"..."}` if generation fails midway

use reqwest::Response;

use super::types::OllamaResponse;
use crate::stream::{Chunk, ChunkParser, NdjsonDecoder, drive};
use crate::config::AdapterConfig;
use crate::transport::{Deadline, byte_stream};
use crate::types::FragmentStream;

pub struct OllamaChunks;

impl ChunkParser for OllamaChunks {
    type Payload = OllamaResponse;

    fn interpret(&self, payload: OllamaResponse) -> Chunk {
        if let Some(error) = payload.error {
            return Chunk::error(error);
        }
        match payload.message.and_then(|m| m.content) {
            Some(text) => Chunk::text(text).with_done(payload.done),
            None if payload.done => Chunk::done(),
            None => Chunk::skip(),
        }
    }
}

pub fn create_stream(
    config: &AdapterConfig,
    deadline: Deadline,
    response: Response,
) -> FragmentStream {
    let body = byte_stream(deadline.backend(), response);
    drive(deadline, body, NdjsonDecoder::new(OllamaChunks), config.api_key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::{Decoded, Decoder};

    #[test]
    fn test_decodes_ollama_lines() {
        let mut decoder = NdjsonDecoder::new(OllamaChunks);
        let out = decoder.feed(
            b"{\"message\":{\"role\":\"assistant\",\"content\":\"The\"},\"done\":false}\n\
              {\"message\":{\"role\":\"assistant\",\"content\":\" end\"},\"done\":false}\n\
              {\"message\":{\"role\":\"assistant\",\"content\":\"\"},\"done\":true,\"eval_count\":2}\n",
        );
        assert_eq!(
            out,
            vec![
                Decoded::Fragment("The".into()),
                Decoded::Fragment(" end".into()),
                Decoded::Done,
            ]
        );
    }

    #[test]
    fn test_error_line_fails_stream() {
        let mut decoder = NdjsonDecoder::new(OllamaChunks);
        let out = decoder.feed(b"{\"error\":\"out of memory\"}\n");
        assert_eq!(out, vec![Decoded::Failed("out of memory".into())]);
    }
}
