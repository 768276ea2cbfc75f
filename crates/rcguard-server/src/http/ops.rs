use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::sync::atomic::Ordering;

use crate::{AppState, CRATE_NAME};

pub(crate) async fn landing_handler() -> Response {
    Json(json!({
        "service": CRATE_NAME,
        "status": "ok",
        "api_version": "v1",
    }))
    .into_response()
}

pub(crate) async fn healthz_handler() -> Response {
    Json(json!({"status": "ok"})).into_response()
}

/// Ready only when the store answers.
pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Response {
    match state.store.ping() {
        Ok(()) => Json(json!({"status": "ready"})).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
                .into_response()
        }
    }
}

pub(crate) async fn version_handler() -> Response {
    Json(json!({
        "service": CRATE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
    }))
    .into_response()
}

/// Plain-text counters, one `name value` line each.
pub(crate) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let m = &state.metrics;
    let body = format!(
        "rcguard_requests_total {}\n\
         rcguard_responses_ok_total {}\n\
         rcguard_responses_client_error_total {}\n\
         rcguard_responses_server_error_total {}\n\
         rcguard_auth_failures_total {}\n\
         rcguard_fraud_checks_total {}\n\
         rcguard_uptime_seconds {}\n",
        m.requests_total.load(Ordering::Relaxed),
        m.responses_ok.load(Ordering::Relaxed),
        m.responses_client_error.load(Ordering::Relaxed),
        m.responses_server_error.load(Ordering::Relaxed),
        m.auth_failures.load(Ordering::Relaxed),
        m.fraud_checks_total.load(Ordering::Relaxed),
        state.started_at.elapsed().as_secs(),
    );
    ([("content-type", "text/plain; version=0.0.4")], body).into_response()
}
