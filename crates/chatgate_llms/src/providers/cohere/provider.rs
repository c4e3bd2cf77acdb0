//! Cohere adapter implementation

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use super::convert::{error_message, from_cohere_response, is_live_body, to_cohere_request};
use super::stream::create_stream;
use super::types::{CohereRequest, CohereResponse};
use crate::config::AdapterConfig;
use crate::error::Result;
use crate::health::HealthCache;
use crate::provider::ChatBackend;
use crate::transport::{
    Deadline, PHASE_GENERATE, PHASE_STREAM, call_span, observed, probe, read_json, send,
};
use crate::types::{Backend, ChatTurn, FragmentStream};

/// Cohere provider, authenticated with a bearer token.
pub struct CohereAdapter {
    config: AdapterConfig,
    client: Client,
    health: HealthCache,
}

impl CohereAdapter {
    /// Environment variable for API key
    pub const API_KEY_ENV: &'static str = "COHERE_API_KEY";

    pub fn new(config: AdapterConfig) -> Self {
        debug_assert_eq!(config.backend, Backend::Cohere);
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
        Self::new(AdapterConfig::from_env(Backend::Cohere))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
    }

    fn chat_request(&self, body: &CohereRequest) -> RequestBuilder {
        self.authorized(self.client.post(self.config.url("v2/chat")))
            .header("Accept", "application/json")
            .json(body)
    }
}

#[async_trait]
impl ChatBackend for CohereAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn health(&self) -> &HealthCache {
        &self.health
    }

    async fn check_health(&self) -> bool {
        self.health
            .check(Backend::Cohere, self.config.is_available(), || {
                let request = self
                    .authorized(self.client.get(self.config.url("v1/models")))
                    .query(&[("page_size", "1")]);
                probe(Backend::Cohere, request, self.config.timeouts.health, is_live_body)
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
            let body = to_cohere_request(&self.config, prompt, history, system, false);

            let deadline =
                Deadline::new(Backend::Cohere, PHASE_GENERATE, self.config.timeouts.generate);
            let response = send(
                &self.config,
                self.chat_request(&body),
                &deadline,
                error_message,
            )
            .await?;
            let reply: CohereResponse = read_json(Backend::Cohere, response, &deadline).await?;
            from_cohere_response(reply)
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
            let body = to_cohere_request(&self.config, prompt, history, system, true);

            let deadline =
                Deadline::new(Backend::Cohere, PHASE_STREAM, self.config.timeouts.stream);
            let request = self
                .authorized(self.client.post(self.config.url("v2/chat")))
                .header("Accept", "text/event-stream")
                .json(&body);
            let response = send(&self.config, request, &deadline, error_message).await?;
            Ok(create_stream(&self.config, deadline, response))
        })
        .await
    }
}
