//! Capability contract and adapter registry

mod trait_def;

pub use trait_def::ChatBackend;

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;

use crate::config::{AdapterConfig, GatewayConfig};
use crate::error::{Error, Result};
use crate::providers::{AnthropicAdapter, CohereAdapter, GeminiAdapter, OllamaAdapter};
use crate::types::{Backend, BackendStatus};

/// Build the adapter matching `config.backend`.
pub fn build_adapter(config: AdapterConfig) -> Arc<dyn ChatBackend> {
    match config.backend {
        Backend::Ollama => Arc::new(OllamaAdapter::new(config)),
        Backend::Cohere => Arc::new(CohereAdapter::new(config)),
        Backend::Anthropic => Arc::new(AnthropicAdapter::new(config)),
        Backend::Gemini => Arc::new(GeminiAdapter::new(config)),
    }
}

/// Registry of adapters, keyed by backend.
#[derive(Default, Clone)]
pub struct AdapterRegistry {
    adapters: HashMap<Backend, Arc<dyn ChatBackend>>,
}

impl AdapterRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// One adapter per configured backend. Disabled adapters are registered
    /// too, so they can report their status.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let adapters = config
            .adapters
            .values()
            .map(|adapter| (adapter.backend, build_adapter(adapter.clone())))
            .collect();
        Self { adapters }
    }

    pub fn from_env() -> Self {
        Self::from_config(&GatewayConfig::from_env())
    }

    /// Register an adapter under its own backend. Returns `self` for chaining.
    pub fn register<A: ChatBackend + 'static>(mut self, adapter: A) -> Self {
        self.adapters.insert(adapter.backend(), Arc::new(adapter));
        self
    }

    pub fn get(&self, backend: Backend) -> Result<Arc<dyn ChatBackend>> {
        self.adapters
            .get(&backend)
            .cloned()
            .ok_or_else(|| Error::BackendNotFound(backend.to_string()))
    }

    /// Look up an adapter by identifier or alias.
    pub fn get_by_id(&self, id: &str) -> Result<Arc<dyn ChatBackend>> {
        self.get(id.parse()?)
    }

    /// Registered backends, in stable order.
    pub fn backends(&self) -> Vec<Backend> {
        let mut backends: Vec<Backend> = self.adapters.keys().copied().collect();
        backends.sort();
        backends
    }

    /// Status of every adapter. Probes run concurrently.
    pub async fn status_all(&self) -> Vec<BackendStatus> {
        let adapters: Vec<_> = self
            .backends()
            .into_iter()
            .filter_map(|b| self.adapters.get(&b).cloned())
            .collect();
        join_all(adapters.iter().map(|a| a.status())).await
    }

    /// Liveness of every adapter. Probes run concurrently.
    pub async fn health_all(&self) -> Vec<(Backend, bool)> {
        let adapters: Vec<_> = self
            .backends()
            .into_iter()
            .filter_map(|b| self.adapters.get(&b).cloned())
            .collect();
        let results = join_all(adapters.iter().map(|a| a.check_health())).await;
        adapters.iter().map(|a| a.backend()).zip(results).collect()
    }
}
