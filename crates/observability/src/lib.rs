//! chatgate observability - tracing bootstrap and span helpers
//!
//! Every binary in the workspace calls [`init`] (or [`init_from_env`]) once at
//! startup. Library crates only emit `tracing` events and use the helpers in
//! [`tracing`](mod@crate::tracing) to annotate spans.
//!
//! # Quick Start
//!
//! ```no_run
//! use chatgate_observability::{init, ObservabilityConfig};
//!
//! let config = ObservabilityConfig::new("chatgate")
//!     .with_otlp_endpoint("http://localhost:4317")
//!     .with_log_level("info,chatgate_llms=debug");
//!
//! init(config).unwrap();
//! tracing::info!("Service started");
//! ```
//!
//! # Environment Variables
//!
//! - `OTEL_SERVICE_NAME` or `SERVICE_NAME` - Service name
//! - `OTEL_SERVICE_VERSION` or `SERVICE_VERSION` - Service version
//! - `OTEL_EXPORTER_OTLP_ENDPOINT` - OTLP endpoint
//! - `CHATGATE_LOG_FORMAT` - `text` (default) or `json`
//! - `OTEL_LOG_LEVEL` or `RUST_LOG` - Log level filter

pub mod config;
pub mod error;
pub mod telemetry;
pub mod tracing;

pub use config::{LogFormat, ObservabilityConfig};
pub use error::ObservabilityError;
pub use telemetry::{init, init_from_env, shutdown};
pub use crate::tracing::{record_duration, record_error};
