//! Anthropic adapter implementation

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use super::convert::{error_message, from_anthropic_response, is_live_body, to_anthropic_request};
use super::stream::create_stream;
use super::types::{AnthropicRequest, AnthropicResponse};
use crate::config::AdapterConfig;
use crate::error::Result;
use crate::health::HealthCache;
use crate::provider::ChatBackend;
use crate::transport::{
    Deadline, PHASE_GENERATE, PHASE_STREAM, call_span, observed, probe, read_json, send,
};
use crate::types::{Backend, ChatTurn, FragmentStream};

/// Anthropic provider
pub struct AnthropicAdapter {
    config: AdapterConfig,
    client: Client,
    health: HealthCache,
}

impl AnthropicAdapter {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "ANTHROPIC_API_KEY";

    /// Value sent in the `anthropic-version` header
    pub const API_VERSION: &'static str = "2023-06-01";

    pub fn new(config: AdapterConfig) -> Self {
        debug_assert_eq!(config.backend, Backend::Anthropic);
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
        Self::new(AdapterConfig::from_env(Backend::Anthropic))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("x-api-key", self.config.api_key.as_deref().unwrap_or_default())
            .header("anthropic-version", Self::API_VERSION)
    }

    fn chat_request(&self, body: &AnthropicRequest) -> RequestBuilder {
        self.authorized(self.client.post(self.config.url("chat/completions")))
            .json(body)
    }
}

#[async_trait]
impl ChatBackend for AnthropicAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn health(&self) -> &HealthCache {
        &self.health
    }

    async fn check_health(&self) -> bool {
        self.health
            .check(Backend::Anthropic, self.config.is_available(), || {
                let request = self
                    .authorized(self.client.get(self.config.url("models")))
                    .query(&[("limit", "1")]);
                probe(Backend::Anthropic, request, self.config.timeouts.health, is_live_body)
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
            let body = to_anthropic_request(&self.config, prompt, history, system, false);

            let deadline =
                Deadline::new(Backend::Anthropic, PHASE_GENERATE, self.config.timeouts.generate);
            let response = send(
                &self.config,
                self.chat_request(&body),
                &deadline,
                error_message,
            )
            .await?;
            let reply: AnthropicResponse =
                read_json(Backend::Anthropic, response, &deadline).await?;
            from_anthropic_response(reply)
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
            let body = to_anthropic_request(&self.config, prompt, history, system, true);

            let deadline =
                Deadline::new(Backend::Anthropic, PHASE_STREAM, self.config.timeouts.stream);
            let response = send(
                &self.config,
                self.chat_request(&body),
                &deadline,
                error_message,
            )
            .await?;
            Ok(create_stream(&self.config, deadline, response))
        })
        .await
    }
}
