//! Gemini adapter implementation

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::json;

use super::convert::{error_message, from_gemini_response, is_live_body, to_gemini_request};
use super::stream::create_stream;
use super::types::{GeminiRequest, GeminiResponse};
use crate::config::AdapterConfig;
use crate::error::Result;
use crate::health::HealthCache;
use crate::provider::ChatBackend;
use crate::transport::{
    Deadline, PHASE_GENERATE, PHASE_STREAM, call_span, observed, probe, read_json, send,
};
use crate::types::{Backend, ChatTurn, FragmentStream};

/// Gemini provider. The key travels in the query string, so request URLs
/// are never logged or included in errors.
pub struct GeminiAdapter {
    config: AdapterConfig,
    client: Client,
    health: HealthCache,
}

impl GeminiAdapter {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "GEMINI_API_KEY";

    pub fn new(config: AdapterConfig) -> Self {
        debug_assert_eq!(config.backend, Backend::Gemini);
        let health = HealthCache::new(config.health_ttl);
        Self {
            config,
            client: Client::new(),
            health,
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn from_env() -> Self {
        Self::new(AdapterConfig::from_env(Backend::Gemini))
    }

    /// `POST models/{model}:{method}?key=...`
    fn model_call(&self, method: &str) -> RequestBuilder {
        let path = format!("models/{}:{}", self.config.model, method);
        self.client
            .post(self.config.url(&path))
            .query(&[("key", self.config.api_key.as_deref().unwrap_or_default())])
    }

    fn generate_request(&self, body: &GeminiRequest, stream: bool) -> RequestBuilder {
        let method = if stream {
            "streamGenerateContent"
        } else {
            "generateContent"
        };
        self.model_call(method).json(body)
    }
}

#[async_trait]
impl ChatBackend for GeminiAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn health(&self) -> &HealthCache {
        &self.health
    }

    async fn check_health(&self) -> bool {
        self.health
            .check(Backend::Gemini, self.config.is_available(), || {
                let request = self
                    .model_call("countTokens")
                    .json(&json!({"contents": [{"parts": [{"text": "ping"}]}]}));
                probe(Backend::Gemini, request, self.config.timeouts.health, is_live_body)
            })
            .await
    }

    async fn generate(
        &self,
        prompt: &str,
        history: &[ChatTurn],
        system: Option<&str>,
    ) -> Result<String> {
        observed(call_span("generate", &self.config), async {
            self.config.ensure_available()?;
            let body = to_gemini_request(&self.config, prompt, history, system);

            let deadline =
                Deadline::new(Backend::Gemini, PHASE_GENERATE, self.config.timeouts.generate);
            let response = send(
                &self.config,
                self.generate_request(&body, false),
                &deadline,
                error_message,
            )
            .await?;
            let reply: GeminiResponse = read_json(Backend::Gemini, response, &deadline).await?;
            from_gemini_response(reply)
        })
        .await
    }

    async fn generate_stream(
        &self,
        prompt: &str,
        history: &[ChatTurn],
        system: Option<&str>,
    ) -> Result<FragmentStream> {
        observed(call_span("stream", &self.config), async {
            self.config.ensure_available()?;
            let body = to_gemini_request(&self.config, prompt, history, system);

            let deadline =
                Deadline::new(Backend::Gemini, PHASE_STREAM, self.config.timeouts.stream);
            let response = send(
                &self.config,
                self.generate_request(&body, true),
                &deadline,
                error_message,
            )
            .await?;
            Ok(create_stream(&self.config, deadline, response))
        })
        .await
    }
}
