//! chatgate_llms — uniform chat-completion gateway over a local model server
//! and hosted vendor APIs, with streaming support.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       AdapterRegistry                        │
//! │        HashMap<Backend, Arc<dyn ChatBackend>>                │
//! │                            │                                 │
//! │      ┌─────────────┬───────┴──────┬──────────────┐           │
//! │      ▼             ▼              ▼              ▼           │
//! │  ┌────────┐   ┌─────────┐   ┌───────────┐   ┌────────┐       │
//! │  │ Ollama │   │ Cohere  │   │ Anthropic │   │ Gemini │       │
//! │  └────────┘   └─────────┘   └───────────┘   └────────┘       │
//! │   NDJSON       event-stream  event-stream    JSON objects    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each adapter owns its configuration, an HTTP client and a health cache.
//! Requests are normalized by [`normalize`], responses decoded by
//! [`stream`], and every failure surfaces as a backend-tagged [`Error`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chatgate_llms::{AdapterRegistry, Backend, ChatTurn};
//! use futures::StreamExt;
//!
//! # async fn run() -> chatgate_llms::Result<()> {
//! let registry = AdapterRegistry::from_env();
//! let adapter = registry.get(Backend::Ollama)?;
//!
//! let history = vec![ChatTurn::user("Hi"), ChatTurn::assistant("Hello!")];
//! let reply = adapter.generate("What is 2+2?", &history, Some("Be terse.")).await?;
//! println!("{reply}");
//!
//! let mut stream = adapter.generate_stream("Count to three", &[], None).await?;
//! while let Some(fragment) = stream.next().await {
//!     print!("{}", fragment?);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod normalize;
pub mod provider;
pub mod providers;
pub mod stream;
pub mod transport;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export core abstractions
pub use config::{AdapterConfig, GatewayConfig, Timeouts};
pub use error::{Error, Result};
pub use health::HealthCache;
pub use provider::{AdapterRegistry, ChatBackend, build_adapter};

// Re-export adapter implementations
pub use providers::{AnthropicAdapter, CohereAdapter, GeminiAdapter, OllamaAdapter};

// Re-export commonly used types
pub use types::{Backend, BackendStatus, ChatTurn, FragmentStream, Liveness, TurnRole};
