//! Conversion between gateway inputs and Ollama types

use serde_json::Value;

use super::types::{OllamaMessage, OllamaOptions, OllamaRequest, OllamaResponse};
use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use crate::normalize::{RoleNames, flat_turns};
use crate::types::{Backend, ChatTurn};

pub fn to_ollama_request(
    config: &AdapterConfig,
    prompt: &str,
    history: &[ChatTurn],
    system: Option<&str>,
    stream: bool,
) -> OllamaRequest {
    let messages = flat_turns(system, history, prompt, RoleNames::STANDARD)
        .into_iter()
        .map(|turn| OllamaMessage {
            role: turn.role.to_string(),
            content: turn.content,
        })
        .collect();

    OllamaRequest {
        model: config.model.clone(),
        messages,
        stream,
        options: OllamaOptions {
            temperature: config.temperature,
            num_predict: config.max_tokens,
        },
    }
}

pub fn from_ollama_response(resp: OllamaResponse) -> Result<String> {
    if let Some(error) = resp.error {
        return Err(Error::wrap(Backend::Ollama, error));
    }
    resp.message
        .and_then(|m| m.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| Error::malformed(Backend::Ollama, "missing message.content"))
}

/// Ollama reports failures as `{"error": "..."}`.
pub fn error_message(body: &Value) -> Option<String> {
    body.get("error")?.as_str().map(str::to_string)
}

/// `GET /api/tags` answers `{"models": [...]}`.
pub fn is_live_body(body: &Value) -> bool {
    body.get("models").is_some_and(Value::is_array)
}
