//! Local Ollama server adapter
//!
//! `POST /api/chat` with a flat turn list; streaming replies are
//! newline-delimited JSON ending with `"done": true`.

mod convert;
mod provider;
mod stream;
mod types;

pub use provider::OllamaAdapter;
pub use types::{OllamaMessage, OllamaOptions, OllamaRequest};
