//! Conversion between gateway inputs and Gemini types

use serde_json::Value;

use super::types::{
    GeminiContent, GeminiGenerationConfig, GeminiInstruction, GeminiPart, GeminiRequest,
    GeminiResponse,
};
use crate::config::AdapterConfig;
use crate::error::{Error, Result};
use crate::normalize::{RoleNames, separated_turns};
use crate::types::{Backend, ChatTurn};

pub fn to_gemini_request(
    config: &AdapterConfig,
    prompt: &str,
    history: &[ChatTurn],
    system: Option<&str>,
) -> GeminiRequest {
    let native = separated_turns(system, history, prompt, RoleNames::GEMINI);

    let contents = native
        .turns
        .into_iter()
        .map(|turn| GeminiContent {
            role: Some(turn.role.to_string()),
            parts: vec![text_part(turn.content)],
        })
        .collect();

    GeminiRequest {
        contents,
        system_instruction: native.instruction.map(|text| GeminiInstruction {
            parts: vec![text_part(text)],
        }),
        generation_config: GeminiGenerationConfig {
            temperature: config.temperature,
            max_output_tokens: config.max_tokens,
        },
    }
}

fn text_part(text: impl Into<String>) -> GeminiPart {
    GeminiPart {
        text: Some(text.into()),
    }
}

pub fn from_gemini_response(resp: GeminiResponse) -> Result<String> {
    if let Some(message) = resp.error.and_then(|e| e.message) {
        return Err(Error::wrap(Backend::Gemini, message));
    }

    let Some(candidate) = resp.candidates.first() else {
        let detail = match resp.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => format!("prompt blocked ({reason})"),
            None => "no candidates in response".to_string(),
        };
        return Err(Error::malformed(Backend::Gemini, detail));
    };

    candidate.text().map(|t| t.trim().to_string()).ok_or_else(|| {
        let detail = match &candidate.finish_reason {
            Some(reason) => format!("candidate has no text (finishReason {reason})"),
            None => "missing candidates[0].content.parts".to_string(),
        };
        Error::malformed(Backend::Gemini, detail)
    })
}

/// Errors arrive as `{"error": {"code": 400, "message": "...", "status": "..."}}`.
pub fn error_message(body: &Value) -> Option<String> {
    // Streamed errors may be wrapped in a one-element array.
    let body = body.as_array().and_then(|a| a.first()).unwrap_or(body);
    body.get("error")?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// `:countTokens` answers `{"totalTokens": n}`.
pub fn is_live_body(body: &Value) -> bool {
    body.get("totalTokens").is_some_and(Value::is_u64)
}
