//! readyz server library entry.
//!
//! Wires the CLI config, shared state, handlers and metrics into an axum
//! server. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
