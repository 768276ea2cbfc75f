use axum::body::Body;
use axum::extract::State;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ORIGIN,
};
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rcguard_api::ApiError;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing::Instrument;

use crate::{api_error_response, AppState};

fn request_id(state: &AppState, headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .filter(|id| !id.is_empty() && id.len() <= 64)
        .map(str::to_string)
        .unwrap_or_else(|| {
            let seq = state.metrics.request_id_seed.fetch_add(1, Ordering::Relaxed);
            format!("req-{seq:08x}")
        })
}

pub(crate) async fn request_tracing_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let route = request.uri().path().to_string();
    let id = request_id(&state, request.headers());

    let span = tracing::info_span!(
        "http.request",
        request_id = %id,
        method = %method,
        route = %route,
    );

    state.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
    let started = Instant::now();
    let mut response = next.run(request).instrument(span.clone()).await;

    let status = response.status();
    let counter = if status.is_server_error() {
        &state.metrics.responses_server_error
    } else if status.is_client_error() {
        &state.metrics.responses_client_error
    } else {
        &state.metrics.responses_ok
    };
    counter.fetch_add(1, Ordering::Relaxed);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        state.metrics.auth_failures.fetch_add(1, Ordering::Relaxed);
    }
    span.in_scope(|| {
        tracing::info!(
            status = status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request complete"
        );
    });

    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Bounds every request to the configured wall-clock budget.
pub(crate) async fn timeout_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let budget = Duration::from_secs(state.api.request_timeout_secs);
    let route = request.uri().path().to_string();
    match tokio::time::timeout(budget, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                route = %route,
                budget_secs = state.api.request_timeout_secs,
                "request exceeded time budget"
            );
            api_error_response(ApiError::timeout())
        }
    }
}

fn apply_cors(state: &AppState, origin: Option<&HeaderValue>, headers: &mut HeaderMap) {
    let allowed = if state.api.cors_allowed_origins.is_empty() {
        Some(HeaderValue::from_static("*"))
    } else {
        origin
            .filter(|value| {
                value
                    .to_str()
                    .is_ok_and(|o| state.api.cors_allowed_origins.iter().any(|a| a == o))
            })
            .cloned()
    };
    if let Some(value) = allowed {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type, authorization, x-admin-key"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        );
    }
}

pub(crate) async fn cors_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN).cloned();
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors(&state, origin.as_ref(), response.headers_mut());
        return response;
    }
    let mut response = next.run(request).await;
    apply_cors(&state, origin.as_ref(), response.headers_mut());
    response
}
