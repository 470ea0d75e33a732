//! HTTP handlers.
//!
//! - `/`        : catch-all, always 200 (also the router fallback)
//! - `/readyz`  : readiness (400 until the startup delay has passed)
//! - `/metrics` : Prometheus text format
//!
//! Only the first two count towards `http_requests_total`.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::app_state::AppState;

pub const ROOT_BODY: &str = "Received a request";

pub async fn root(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics().http_requests.inc();
    tracing::info!("{ROOT_BODY}");
    ROOT_BODY
}

pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    state.metrics().http_requests.inc();

    tracing::debug!(ready_after = ?state.readiness().delay(), "readiness threshold");

    let check = state.readiness().check();
    let status = if check.readiness.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    let body = check.message();
    tracing::info!(status = status.as_u16(), "{}", body.trim_end());
    (status, body)
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let metrics = state.metrics();
    let body = {
        let _in_flight = metrics.scrape_in_flight();
        metrics.render()
    };
    metrics
        .metrics_handler_requests
        .inc(&[("code", StatusCode::OK.as_str())]);

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}
