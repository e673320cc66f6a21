// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// The engine itself is stateless; the only mutable value is a lock-free
// request counter reported by the health endpoint.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use crate::engine::Engine;
use crate::runtime_config::EngineConfig;

/// Shared across handlers via `Arc<AppState>`.
#[derive(Debug)]
pub struct AppState {
    pub engine: Engine,
    pub config: EngineConfig,
    requests_served: AtomicU64,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            engine: Engine::from_config(&config),
            config,
            requests_served: AtomicU64::new(0),
        }
    }

    /// Count one completed enrich request; returns the new total.
    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}
