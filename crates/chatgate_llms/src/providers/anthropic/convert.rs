//! Conversion between gateway inputs and Anthropic types

use serde_json::Value;

use super::types::{AnthropicMessage, AnthropicRequest, AnthropicResponse};
use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use crate::normalize::{RoleNames, flat_turns};
use crate::types::{Backend, ChatTurn};

pub fn to_anthropic_request(
    config: &AdapterConfig,
    prompt: &str,
    history: &[ChatTurn],
    system: Option<&str>,
    stream: bool,
) -> AnthropicRequest {
    let messages = flat_turns(system, history, prompt, RoleNames::STANDARD)
        .into_iter()
        .map(|turn| AnthropicMessage {
            role: turn.role.to_string(),
            content: turn.content,
        })
        .collect();

    AnthropicRequest {
        model: config.model.clone(),
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        stream,
    }
}

pub fn from_anthropic_response(resp: AnthropicResponse) -> Result<String> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| Error::malformed(Backend::Anthropic, "no choices in response"))?;

    choice
        .message
        .and_then(|m| m.content)
        .map(|text| text.trim().to_string())
        .ok_or_else(|| Error::malformed(Backend::Anthropic, "missing choices[0].message.content"))
}

/// Errors arrive as `{"error": {"type": "...", "message": "..."}}`.
pub fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
}

/// `GET /models` answers `{"data": [...]}`.
pub fn is_live_body(body: &Value) -> bool {
    body.get("data").is_some_and(Value::is_array)
}
