//! Configuration for observability/telemetry

use serde::{Deserialize, Serialize};

use crate::error::ObservabilityError;

const DEFAULT_SERVICE_NAME: &str = "chatgate";

/// Console log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Text,
    /// One JSON object per line, for log shippers
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = ObservabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(ObservabilityError::UnknownLogFormat(other.to_string())),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Service name for traces (e.g., "chatgate", "chatgate-cli")
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Service version (optional, defaults to "unknown")
    #[serde(default)]
    pub service_version: Option<String>,

    /// OTLP endpoint for trace export (e.g., "http://localhost:4317")
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Enable console/log output in addition to OTLP export
    #[serde(default = "default_true")]
    pub enable_console: bool,

    /// Console line format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter (e.g., "info", "chatgate_llms=debug")
    /// Defaults to "info" if not set
    #[serde(default)]
    pub log_level: Option<String>,

    /// Additional resource attributes (key-value pairs)
    #[serde(default)]
    pub resource_attributes: Vec<(String, String)>,
}

fn default_service_name() -> String {
    DEFAULT_SERVICE_NAME.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            service_version: None,
            otlp_endpoint: None,
            enable_console: true,
            log_format: LogFormat::Text,
            log_level: None,
            resource_attributes: Vec::new(),
        }
    }
}

impl ObservabilityConfig {
    /// Create a new configuration with service name
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Set service version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.service_version = Some(version.into());
        self
    }

    /// Set OTLP endpoint
    pub fn with_otlp_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.otlp_endpoint = Some(endpoint.into());
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enable: bool) -> Self {
        self.enable_console = enable;
        self
    }

    /// Set console line format
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Add resource attribute
    pub fn with_resource_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.resource_attributes.push((key.into(), value.into()));
        self
    }

    /// Build from environment variables
    ///
    /// Reads:
    /// - `OTEL_SERVICE_NAME` or `SERVICE_NAME` → service_name
    /// - `OTEL_SERVICE_VERSION` or `SERVICE_VERSION` → service_version
    /// - `OTEL_EXPORTER_OTLP_ENDPOINT` → otlp_endpoint
    /// - `CHATGATE_LOG_FORMAT` → log_format (`text` or `json`)
    /// - `OTEL_LOG_LEVEL` or `RUST_LOG` → log_level
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |keys: &[&str]| keys.iter().find_map(|k| lookup(k));

        let service_name =
            first(&["OTEL_SERVICE_NAME", "SERVICE_NAME"]).unwrap_or_else(default_service_name);
        let service_version = first(&["OTEL_SERVICE_VERSION", "SERVICE_VERSION"]);

        // Only enable OTLP when explicitly set; otherwise console-only (avoids connection-refused noise).
        let otlp_endpoint = first(&["OTEL_EXPORTER_OTLP_ENDPOINT"]);

        let log_format = first(&["CHATGATE_LOG_FORMAT"])
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let log_level = first(&["OTEL_LOG_LEVEL", "RUST_LOG"]);

        Self {
            service_name,
            service_version,
            otlp_endpoint,
            enable_console: true,
            log_format,
            log_level,
            resource_attributes: Vec::new(),
        }
    }
}
