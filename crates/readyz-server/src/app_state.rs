//! Shared application state for the readyz server.
//!
//! Holds the readiness gate (start time + delay) and the metrics registry.
//! Both are created once before the listener accepts and are shared by `Arc`.

use std::sync::Arc;
use std::time::{Instant, SystemTime};

use readyz_core::ReadinessGate;

use crate::config::ServerConfig;
use crate::obs::ServerMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    readiness: ReadinessGate,
    metrics: ServerMetrics,
}

impl AppState {
    /// Capture the process start time now.
    pub fn new(cfg: ServerConfig) -> Self {
        Self::starting_at(cfg, Instant::now(), SystemTime::now())
    }

    pub fn starting_at(cfg: ServerConfig, started_at: Instant, started_wall: SystemTime) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                readiness: ReadinessGate::starting_at(started_at, cfg.delay),
                metrics: ServerMetrics::new(started_wall),
            }),
        }
    }

    pub fn readiness(&self) -> &ReadinessGate {
        &self.inner.readiness
    }

    pub fn metrics(&self) -> &ServerMetrics {
        &self.inner.metrics
    }
}
