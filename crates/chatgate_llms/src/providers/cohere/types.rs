//! Cohere v2 wire types

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct CohereRequest {
    pub model: String,
    pub messages: Vec<CohereMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohereMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereResponse {
    #[serde(default)]
    pub message: Option<CohereResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereResponseMessage {
    #[serde(default)]
    pub content: Option<Vec<CohereContentBlock>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereContentBlock {
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// One `data:` payload of a streamed reply
#[derive(Debug, Clone, Deserialize)]
pub struct CohereStreamEvent {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub delta: Option<CohereDelta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereDelta {
    #[serde(default)]
    pub message: Option<CohereDeltaMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereDeltaMessage {
    #[serde(default)]
    pub content: Option<CohereDeltaContent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CohereDeltaContent {
    #[serde(default)]
    pub text: Option<String>,
}
