#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use rcguard_api::{error_envelope, ApiError, ApiErrorCode};
use rcguard_core::IdGenerator;
use rcguard_store::{DocumentStore, StoreError};
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Instant;
use tracing::error;

mod audit;
mod auth;
mod config;
mod http;
mod middleware;

pub use config::{validate_startup_config_contract, ApiConfig, CONFIG_SCHEMA_VERSION};

pub const CRATE_NAME: &str = "rcguard-server";

#[derive(Default)]
pub struct Metrics {
    pub requests_total: AtomicU64,
    pub responses_ok: AtomicU64,
    pub responses_client_error: AtomicU64,
    pub responses_server_error: AtomicU64,
    pub auth_failures: AtomicU64,
    pub fraud_checks_total: AtomicU64,
    pub(crate) request_id_seed: AtomicU64,
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub api: Arc<ApiConfig>,
    pub ids: Arc<IdGenerator>,
    pub metrics: Arc<Metrics>,
    pub started_at: Instant,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<DocumentStore>, api: ApiConfig) -> Self {
        Self {
            store,
            api: Arc::new(api),
            ids: Arc::new(IdGenerator::new()),
            metrics: Arc::new(Metrics::default()),
            started_at: Instant::now(),
        }
    }
}

fn status_for(code: ApiErrorCode) -> StatusCode {
    match code {
        ApiErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ApiErrorCode::ValidationFailed => StatusCode::UNPROCESSABLE_ENTITY,
        ApiErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ApiErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
        ApiErrorCode::Conflict => StatusCode::CONFLICT,
        ApiErrorCode::Timeout => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn api_error_response(err: ApiError) -> Response {
    (status_for(err.code), Json(error_envelope(&err))).into_response()
}

/// Store failures never leak details to the wire; the cause goes to the log.
pub(crate) fn store_failure(op: &'static str, err: &StoreError) -> Response {
    error!(error = %err, op, "store operation failed");
    api_error_response(ApiError::internal())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::ops::landing_handler))
        .route("/healthz", get(http::ops::healthz_handler))
        .route("/readyz", get(http::ops::readyz_handler))
        .route("/metrics", get(http::ops::metrics_handler))
        .route("/v1/version", get(http::ops::version_handler))
        .route("/api/auth/signup", post(http::auth_routes::signup_handler))
        .route("/api/auth/signin", post(http::auth_routes::signin_handler))
        .route("/api/auth/logout", post(http::auth_routes::logout_handler))
        .route("/api/vehicles", get(http::vehicles::list_vehicles_handler))
        .route(
            "/api/vehicles/search",
            get(http::vehicles::search_handler),
        )
        .route(
            "/api/vehicles/fraud-check",
            post(http::vehicles::fraud_check_handler),
        )
        .route(
            "/api/vehicles/:id/flags",
            get(http::flags::list_flags_handler),
        )
        .route(
            "/api/vehicles/:id/verifications",
            get(http::vehicles::list_verifications_handler),
        )
        .route(
            "/api/flags/:id/resolve",
            post(http::flags::resolve_flag_handler),
        )
        .route("/api/audit", get(http::flags::list_audit_handler))
        .route(
            "/api/rc",
            get(http::rc_admin::list_rc_handler).post(http::rc_admin::create_rc_handler),
        )
        .route("/api/rc/search", get(http::rc_admin::search_rc_handler))
        .route(
            "/api/rc/:id",
            put(http::rc_admin::update_rc_handler)
                .get(http::rc_admin::get_rc_handler)
                .delete(http::rc_admin::delete_rc_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::request_tracing_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::cors_middleware,
        ))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}
