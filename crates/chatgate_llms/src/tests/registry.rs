use std::collections::HashMap;

use async_trait::async_trait;

use crate::config::{AdapterConfig, GatewayConfig};
use crate::error::{Error, Result};
use crate::health::HealthCache;
use crate::provider::{AdapterRegistry, ChatBackend};
use crate::types::{Backend, ChatTurn, FragmentStream};

/// Adapter stand-in with a fixed health answer
struct MockBackend {
    config: AdapterConfig,
    health: HealthCache,
    healthy: bool,
}

impl MockBackend {
    fn new(backend: Backend, healthy: bool) -> Self {
        let config = AdapterConfig::new(backend).with_api_key("mock");
        let health = HealthCache::new(config.health_ttl);
        Self {
            config,
            health,
            healthy,
        }
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    fn config(&self) -> &AdapterConfig {
        &self.config
    }

    fn health(&self) -> &HealthCache {
        &self.health
    }

    async fn check_health(&self) -> bool {
        let healthy = self.healthy;
        self.health
            .check(self.backend(), true, || async move { healthy })
            .await
    }

    async fn generate(&self, prompt: &str, _: &[ChatTurn], _: Option<&str>) -> Result<String> {
        Ok(format!("echo: {prompt}"))
    }

    async fn generate_stream(
        &self,
        _: &str,
        _: &[ChatTurn],
        _: Option<&str>,
    ) -> Result<FragmentStream> {
        Err(Error::wrap(self.backend(), "streaming not supported"))
    }
}

#[test]
fn test_register_and_get_adapter() {
    let registry = AdapterRegistry::new().register(MockBackend::new(Backend::Cohere, true));

    let adapter = registry.get(Backend::Cohere);
    assert!(adapter.is_ok());
    assert_eq!(adapter.unwrap().backend(), Backend::Cohere);
}

#[test]
fn test_lookup_by_id_and_alias() {
    let registry = AdapterRegistry::new().register(MockBackend::new(Backend::Gemini, true));

    tokio_test::assert_ok!(registry.get_by_id("gemini"));
    tokio_test::assert_ok!(registry.get_by_id("google"));
    assert!(matches!(
        registry.get_by_id("ollama"),
        Err(Error::BackendNotFound(_))
    ));
    assert!(matches!(
        registry.get_by_id("nonexistent"),
        Err(Error::BackendNotFound(_))
    ));
}

#[test]
fn test_from_config_registers_every_backend_in_order() {
    let registry = AdapterRegistry::from_config(&GatewayConfig::default());
    assert_eq!(registry.backends(), Backend::ALL.to_vec());
}

#[tokio::test]
async fn test_status_all_never_exposes_keys() {
    // Nothing here is available, so no adapter touches the network.
    let values: HashMap<&str, &str> = HashMap::from([
        ("OLLAMA_ENABLED", "false"),
        ("COHERE_API_KEY", "co-secret-1"),
        ("COHERE_ENABLED", "false"),
        ("GEMINI_API_KEY", "gm-secret-2"),
        ("GEMINI_ENABLED", "false"),
    ]);
    let config = GatewayConfig::from_lookup(move |key| values.get(key).map(|v| v.to_string()));

    let registry = AdapterRegistry::from_config(&config);
    let statuses = registry.status_all().await;

    assert_eq!(statuses.len(), 4);
    assert!(statuses.iter().all(|s| !s.healthy));
    let gemini = statuses.iter().find(|s| s.backend == Backend::Gemini).unwrap();
    assert!(!gemini.enabled);
    assert!(gemini.api_key_configured);

    let json = serde_json::to_string(&statuses).unwrap();
    assert!(!json.contains("secret"));
}

#[tokio::test]
async fn test_health_all_runs_every_adapter() {
    let registry = AdapterRegistry::new()
        .register(MockBackend::new(Backend::Anthropic, true))
        .register(MockBackend::new(Backend::Ollama, false));

    let health = registry.health_all().await;
    assert_eq!(
        health,
        vec![(Backend::Ollama, false), (Backend::Anthropic, true)]
    );
}

#[test]
fn test_trait_object_dispatch() {
    let registry = AdapterRegistry::new().register(MockBackend::new(Backend::Ollama, true));
    let adapter = registry.get(Backend::Ollama).unwrap();

    tokio_test::block_on(async {
        assert_eq!(adapter.generate("hi", &[], None).await.unwrap(), "echo: hi");
        let err = tokio_test::assert_err!(adapter.generate_stream("hi", &[], None).await);
        assert_eq!(err.to_string(), "Ollama: streaming not supported");

        let status = adapter.status().await;
        assert!(status.healthy);
        assert!(status.api_key_configured);
    });
}
