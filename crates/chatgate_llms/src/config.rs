//! Per-adapter configuration.
//!
//! Every adapter reads `{PREFIX}_ENABLED`, `{PREFIX}_API_KEY`,
//! `{PREFIX}_BASE_URL`, `{PREFIX}_MODEL`, `{PREFIX}_TEMPERATURE` and
//! `{PREFIX}_MAX_TOKENS`, plus the shared `CHATGATE_HEALTH_TTL_SECS`.
//! Unparseable values fall back to the default with a warning.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::{Error, Result};
use crate::types::Backend;

/// Shared health cache TTL override.
pub const HEALTH_TTL_ENV: &str = "CHATGATE_HEALTH_TTL_SECS";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_HEALTH_TTL: Duration = Duration::from_secs(30);

/// Wall-clock bounds for each kind of outbound call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub health: Duration,
    pub generate: Duration,
    /// Bounds the whole stream, from request to last fragment
    pub stream: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            health: Duration::from_secs(5),
            generate: Duration::from_secs(120),
            stream: Duration::from_secs(180),
        }
    }
}

/// Configuration for one adapter. Read-only once the adapter is built.
#[derive(Clone)]
pub struct AdapterConfig {
    pub backend: Backend,
    pub enabled: bool,
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeouts: Timeouts,
    pub health_ttl: Duration,
}

impl AdapterConfig {
    /// Defaults for `backend`: enabled, no key, the public endpoint.
    pub fn new(backend: Backend) -> Self {
        let (base_url, model) = match backend {
            Backend::Ollama => ("http://localhost:11434", "llama3.2"),
            Backend::Cohere => ("https://api.cohere.com", "command-r-plus"),
            Backend::Anthropic => ("https://api.anthropic.com/v1", "claude-sonnet-4-20250514"),
            Backend::Gemini => (
                "https://generativelanguage.googleapis.com/v1beta",
                "gemini-2.0-flash",
            ),
        };

        Self {
            backend,
            enabled: true,
            api_key: None,
            base_url: base_url.to_string(),
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeouts: Timeouts::default(),
            health_ttl: DEFAULT_HEALTH_TTL,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        let key = api_key.into();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_health_ttl(mut self, ttl: Duration) -> Self {
        self.health_ttl = ttl;
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env(backend: Backend) -> Self {
        Self::from_lookup(backend, |key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(backend: Backend, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = backend.env_prefix();
        let var = |suffix: &str| {
            let key = format!("{prefix}_{suffix}");
            lookup(&key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| (key, v))
        };

        let mut config = Self::new(backend);

        if let Some((key, value)) = var("ENABLED") {
            config.enabled = parse_bool(&value).unwrap_or_else(|| {
                warn!(key = %key, value = %value, "Ignoring invalid boolean");
                true
            });
        }
        if let Some((_, key)) = var("API_KEY") {
            config.api_key = Some(key);
        }
        if let Some((_, url)) = var("BASE_URL") {
            config = config.with_base_url(url);
        }
        if let Some((_, model)) = var("MODEL") {
            config.model = model;
        }
        if let Some((key, value)) = var("TEMPERATURE") {
            config.temperature = parse_or(&key, &value, DEFAULT_TEMPERATURE);
        }
        if let Some((key, value)) = var("MAX_TOKENS") {
            config.max_tokens = parse_or(&key, &value, DEFAULT_MAX_TOKENS);
        }
        if let Some(value) = lookup(HEALTH_TTL_ENV).filter(|v| !v.trim().is_empty()) {
            let secs = parse_or(HEALTH_TTL_ENV, value.trim(), DEFAULT_HEALTH_TTL.as_secs());
            config.health_ttl = Duration::from_secs(secs);
        }

        config
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    /// Fail fast, without touching the network, when the adapter cannot
    /// be used.
    pub fn ensure_available(&self) -> Result<()> {
        if !self.enabled {
            return Err(Error::Disabled {
                backend: self.backend,
            });
        }
        if self.backend.requires_api_key() && !self.has_api_key() {
            return Err(Error::MissingApiKey {
                backend: self.backend,
            });
        }
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.ensure_available().is_ok()
    }

    /// Join `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("backend", &self.backend)
            .field("enabled", &self.enabled)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeouts", &self.timeouts)
            .field("health_ttl", &self.health_ttl)
            .finish()
    }
}

/// Configuration for every backend the gateway knows about.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub adapters: HashMap<Backend, AdapterConfig>,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let adapters = Backend::ALL
            .iter()
            .map(|&backend| (backend, AdapterConfig::from_lookup(backend, &lookup)))
            .collect();
        Self { adapters }
    }

    pub fn get(&self, backend: Backend) -> Option<&AdapterConfig> {
        self.adapters.get(&backend)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        let adapters = Backend::ALL
            .iter()
            .map(|&backend| (backend, AdapterConfig::new(backend)))
            .collect();
        Self { adapters }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_or<T: FromStr>(key: &str, value: &str, default: T) -> T {
    value.parse().unwrap_or_else(|_| {
        warn!(key = %key, value = %value, "Ignoring unparseable setting");
        default
    })
}
