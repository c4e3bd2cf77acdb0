//! The capability contract every backend adapter implements.

use async_trait::async_trait;

use crate::config::AdapterConfig;
use crate::error::Result;
use crate::health::HealthCache;
use crate::types::{Backend, BackendStatus, ChatTurn, FragmentStream};

/// Uniform chat-completion interface over one backend.
///
/// `history` is the ordered list of prior turns; `system` is an optional
/// instruction. Every error carries the backend label and never contains
/// the configured credential.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Configuration the adapter was built with
    fn config(&self) -> &AdapterConfig;

    /// The adapter's own liveness cache
    fn health(&self) -> &HealthCache;

    fn backend(&self) -> Backend {
        self.config().backend
    }

    /// Cached liveness probe. Never fails: any problem reads as `false`.
    async fn check_health(&self) -> bool;

    /// Generate a complete reply, trimmed.
    async fn generate(
        &self,
        prompt: &str,
        history: &[ChatTurn],
        system: Option<&str>,
    ) -> Result<String>;

    /// Generate a reply as a lazy sequence of fragments.
    ///
    /// Errors before the first byte (configuration, status) are returned
    /// directly; later ones arrive as the last item of the stream.
    async fn generate_stream(
        &self,
        prompt: &str,
        history: &[ChatTurn],
        system: Option<&str>,
    ) -> Result<FragmentStream>;

    /// Diagnostic record, including a fresh or cached liveness check.
    async fn status(&self) -> BackendStatus {
        let healthy = self.check_health().await;
        BackendStatus::new(self.config(), healthy, self.health().liveness())
    }
}
