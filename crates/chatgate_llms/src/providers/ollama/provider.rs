//! Ollama adapter implementation

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use super::convert::{error_message, from_ollama_response, is_live_body, to_ollama_request};
use super::stream::create_stream;
use super::types::{OllamaRequest, OllamaResponse};
use crate::config::AdapterConfig;
use crate::error::Result;
use crate::health::HealthCache;
use crate::provider::ChatBackend;
use crate::transport::{
    Deadline, PHASE_GENERATE, PHASE_STREAM, call_span, observed, probe, read_json, send,
};
use crate::types::{Backend, ChatTurn, FragmentStream};

/// Adapter for a locally hosted Ollama server. Needs no credential.
pub struct OllamaAdapter {
    config: AdapterConfig,
    client: Client,
    health: HealthCache,
}

impl OllamaAdapter {
    pub fn new(config: AdapterConfig) -> Self {
        debug_assert_eq!(config.backend, Backend::Ollama);
        let health = HealthCache::new(config.health_ttl);
        Self {
            config,
            client: Client::new(),
            health,
        }
    }

    /// Use a preconfigured HTTP client (proxies, TLS roots).
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Create adapter from `OLLAMA_*` environment variables
    pub fn from_env() -> Self {
        Self::new(AdapterConfig::from_env(Backend::Ollama))
    }

    fn chat_request(&self, body: &OllamaRequest) -> RequestBuilder {
        self.client.post(self.config.url("api/chat")).json(body)
    }
}

#[async_trait]
impl ChatBackend for OllamaAdapter {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn health(&self) -> &HealthCache {
        &self.health
    }

    async fn check_health(&self) -> bool {
        self.health
            .check(Backend::Ollama, self.config.is_available(), || {
                probe(
                    Backend::Ollama,
                    self.client.get(self.config.url("api/tags")),
                    self.config.timeouts.health,
                    is_live_body,
                )
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
            let body = to_ollama_request(&self.config, prompt, history, system, false);

            let deadline =
                Deadline::new(Backend::Ollama, PHASE_GENERATE, self.config.timeouts.generate);
            let response = send(
                &self.config,
                self.chat_request(&body),
                &deadline,
                error_message,
            )
            .await?;
            let reply: OllamaResponse = read_json(Backend::Ollama, response, &deadline).await?;
            from_ollama_response(reply)
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
            let body = to_ollama_request(&self.config, prompt, history, system, true);

            let deadline =
                Deadline::new(Backend::Ollama, PHASE_STREAM, self.config.timeouts.stream);
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
