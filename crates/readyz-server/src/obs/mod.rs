//! Lightweight in-process metrics.
//!
//! Metrics are stored as atomics and rendered in the Prometheus text
//! exposition format by the `/metrics` handler.

pub mod metrics;

pub use metrics::{Counter, CounterVec, ServerMetrics};
