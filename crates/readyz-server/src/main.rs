//! readyz server
//!
//! - `/`        : "Received a request"
//! - `/readyz`  : 400 until `-delay-ready` seconds have passed, then 200
//! - `/metrics` : `http_requests_total` in Prometheus text format

use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use readyz_server::{app_state::AppState, config, server};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Start time is captured before argument parsing and binding.
    let started_at = std::time::Instant::now();
    let started_wall = std::time::SystemTime::now();

    let args = config::ServerArgs::from_env();
    tracing::info!(delay_ready = args.delay_ready, "readiness delay configured");
    let cfg = args.into_config();

    let state = AppState::starting_at(cfg, started_at, started_wall);

    let listener = match server::bind(config::LISTEN_ADDR).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "startup failed");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(listen = config::LISTEN_ADDR, "server started");

    match server::serve(listener, state, server::shutdown_signal()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(kind = e.kind(), error = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}
