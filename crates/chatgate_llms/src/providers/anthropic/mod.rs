//! Anthropic adapter over the chat-completions compatible endpoint
//!
//! `POST /chat/completions` authenticated with `x-api-key` plus the
//! `anthropic-version` header. Streaming uses event-stream framing with
//! `choices[0].delta.content` deltas and a `data: [DONE]` sentinel.

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::AnthropicAdapter;
pub use types::{AnthropicMessage, AnthropicRequest};
