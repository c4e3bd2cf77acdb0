//! Conversion between gateway inputs and Cohere types

use serde_json::Value;

use super::types::{CohereMessage, CohereRequest, CohereResponse};
use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use crate::normalize::{RoleNames, flat_turns};
use crate::types::{Backend, ChatTurn};

pub fn to_cohere_request(
    config: &AdapterConfig,
    prompt: &str,
    history: &[ChatTurn],
    system: Option<&str>,
    stream: bool,
) -> CohereRequest {
    let messages = flat_turns(system, history, prompt, RoleNames::STANDARD)
        .into_iter()
        .map(|turn| CohereMessage {
            role: turn.role.to_string(),
            content: turn.content,
        })
        .collect();

    CohereRequest {
        model: config.model.clone(),
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        stream,
    }
}

/// Concatenate the text blocks of `message.content`.
pub fn from_cohere_response(resp: CohereResponse) -> Result<String> {
    let blocks = resp
        .message
        .and_then(|m| m.content)
        .ok_or_else(|| Error::malformed(Backend::Cohere, "missing message.content"))?;

    let texts: Vec<String> = blocks
        .into_iter()
        .filter(|b| b.type_.as_deref().is_none_or(|t| t == "text"))
        .filter_map(|b| b.text)
        .collect();

    if texts.is_empty() {
        return Err(Error::malformed(
            Backend::Cohere,
            "no text block in message.content",
        ));
    }
    Ok(texts.concat().trim().to_string())
}

/// Cohere reports failures as `{"message": "..."}`.
pub fn error_message(body: &Value) -> Option<String> {
    body.get("message")?.as_str().map(str::to_string)
}

/// `GET /v1/models` answers `{"models": [...]}`.
pub fn is_live_body(body: &Value) -> bool {
    body.get("models").is_some_and(Value::is_array)
}
