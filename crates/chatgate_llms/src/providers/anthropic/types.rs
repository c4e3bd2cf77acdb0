//! Anthropic chat-completions wire types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub messages: Vec<AnthropicMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    pub choices: Vec<AnthropicChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicChoice {
    #[serde(default)]
    pub message: Option<AnthropicResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// One `data:` payload of a streamed reply
#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicStreamChunk {
    #[serde(default)]
    pub choices: Vec<AnthropicStreamChoice>,
    #[serde(default)]
    pub error: Option<AnthropicError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicStreamChoice {
    #[serde(default)]
    pub delta: Option<AnthropicDelta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnthropicError {
    #[serde(default)]
    pub message: Option<String>,
}
