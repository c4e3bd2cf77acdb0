//! Google Gemini adapter
//!
//! `POST /models/{model}:generateContent` with the key as a `key` query
//! parameter. History uses `user`/`model` roles and the system instruction
//! travels in `systemInstruction`. Streamed replies are one JSON object per
//! line; the stream ends once a candidate reports a `finishReason`.

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::GeminiAdapter;
pub use types::{GeminiContent, GeminiPart, GeminiRequest};
