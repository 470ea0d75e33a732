//! Axum router wiring.
//!
//! Routes accept any method. Paths without a route of their own fall back to
//! the root handler.

use axum::{routing::any, Router};

use crate::{app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(ops::root))
        .route("/readyz", any(ops::readyz))
        .route("/metrics", any(ops::metrics))
        .fallback(ops::root)
        .with_state(state)
}
