//! Subscriber initialization: console logging (text or JSON) plus optional
//! OTLP span export via OpenTelemetry 0.31.
//!
//! Based on OpenTelemetry Rust 0.31 API patterns from:
//! https://github.com/open-telemetry/opentelemetry-rust
//! https://docs.rs/opentelemetry-otlp/0.31.0/opentelemetry_otlp/

use once_cell::sync::OnceCell;
use opentelemetry::{global, trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::config::{LogFormat, ObservabilityConfig};
use crate::error::ObservabilityError;

// Store the tracer provider for proper shutdown
static TRACER_PROVIDER: OnceCell<SdkTracerProvider> = OnceCell::new();

/// Install the global tracing subscriber.
///
/// Console output is always available; OTLP export is added only when
/// `otlp_endpoint` is set. Fails if a global subscriber is already installed.
pub fn init(config: ObservabilityConfig) -> Result<(), ObservabilityError> {
    let env_filter = match &config.log_level {
        Some(level) => tracing_subscriber::EnvFilter::try_new(level).map_err(|e| {
            ObservabilityError::InvalidFilter {
                filter: level.clone(),
                message: e.to_string(),
            }
        })?,
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };

    let mut attributes = vec![KeyValue::new("service.name", config.service_name.clone())];

    if let Some(version) = &config.service_version {
        attributes.push(KeyValue::new("service.version", version.clone()));
    }

    for (key, value) in &config.resource_attributes {
        attributes.push(KeyValue::new(key.clone(), value.clone()));
    }

    // In 0.31, Resource constructors are private; ResourceBuilder is the public API
    let resource = Resource::builder().with_attributes(attributes).build();

    // Build layers first (build separately, then compose once to avoid type mismatch).
    // Console logs go to stderr; stdout belongs to command output.
    let text_layer = (config.enable_console && config.log_format == LogFormat::Text)
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let json_layer = (config.enable_console && config.log_format == LogFormat::Json)
        .then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr));

    let otel_layer = if let Some(endpoint) = &config.otlp_endpoint {
        match build_otlp_tracer_provider(&config.service_name, endpoint, resource) {
            Ok((tracer, provider)) => {
                // Set as global provider BEFORE creating layer (important ordering)
                global::set_tracer_provider(provider.clone());
                let _ = TRACER_PROVIDER.set(provider);
                Some(OpenTelemetryLayer::new(tracer))
            }
            Err(e) => {
                eprintln!("chatgate: {e}; console only");
                None
            }
        }
    } else {
        None
    };
    let otlp_enabled = otel_layer.is_some();

    // Compose subscriber once (no mutation, avoids type mismatch)
    Registry::default()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(otel_layer)
        .try_init()
        .map_err(|e| ObservabilityError::InitFailed(e.to_string()))?;

    tracing::info!(
        service.name = %config.service_name,
        otlp.enabled = otlp_enabled,
        "Tracing initialized"
    );

    Ok(())
}

/// Build an OTLP (gRPC) span exporter and batch tracer provider.
fn build_otlp_tracer_provider(
    service_name: &str,
    endpoint: &str,
    resource: Resource,
) -> Result<(opentelemetry_sdk::trace::SdkTracer, SdkTracerProvider), ObservabilityError> {
    let span_exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint.to_string())
        .build()
        .map_err(|e| ObservabilityError::Exporter {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;

    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(span_exporter)
        .with_resource(resource)
        .build();

    let tracer = provider.tracer(service_name.to_string());

    Ok((tracer, provider))
}

/// Flush and shut down the OTLP tracer provider, if one was installed.
pub fn shutdown() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        let _ = provider.shutdown();
        tracing::debug!("OpenTelemetry tracer provider shut down");
    }
}

/// Initialize with configuration read from environment variables
pub fn init_from_env() -> Result<(), ObservabilityError> {
    init(ObservabilityConfig::from_env())
}
