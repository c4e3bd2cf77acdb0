//! Time-bounded memo of the last liveness probe.

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::types::{Backend, Liveness};

#[derive(Debug, Clone, Copy)]
struct Entry {
    healthy: bool,
    checked_at: Instant,
}

/// Per-adapter health cache.
///
/// A result younger than the TTL is returned without probing. Concurrent
/// checks on a stale entry may each probe; the last writer wins.
#[derive(Debug)]
pub struct HealthCache {
    ttl: Duration,
    state: Mutex<Option<Entry>>,
}

impl HealthCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached result, if one exists and is still within the TTL.
    pub fn fresh(&self) -> Option<bool> {
        let state = self.state.lock().ok()?;
        (*state)
            .filter(|entry| entry.checked_at.elapsed() < self.ttl)
            .map(|entry| entry.healthy)
    }

    pub fn record(&self, healthy: bool) {
        if let Ok(mut state) = self.state.lock() {
            *state = Some(Entry {
                healthy,
                checked_at: Instant::now(),
            });
        }
    }

    /// Outcome of the most recent probe, regardless of age.
    pub fn liveness(&self) -> Liveness {
        match self.state.lock() {
            Ok(state) => (*state).map(|e| Liveness::from(e.healthy)).unwrap_or_default(),
            Err(_) => Liveness::Unknown,
        }
    }

    /// Report liveness, probing only when the cached entry is stale.
    ///
    /// An unavailable adapter (disabled, or missing its key) answers `false`
    /// without probing and without touching the cache.
    pub async fn check<F, Fut>(&self, backend: Backend, available: bool, probe: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = bool>,
    {
        if !available {
            return false;
        }
        if let Some(healthy) = self.fresh() {
            debug!(backend = %backend, healthy, "Health served from cache");
            return healthy;
        }

        let healthy = probe().await;
        self.record(healthy);
        debug!(backend = %backend, healthy, "Health probed");
        healthy
    }
}
