use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rcguard_api::{flag_view, parse_page_params, ApiError, Paged, ResolveFlagRequest};
use rcguard_core::now_utc;
use rcguard_model::{AuditAction, DocId};
use rcguard_store::StoreError;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::auth::{admin_authorized, authenticate};
use crate::{api_error_response, audit, store_failure, AppState};

/// Flags for one vehicle. `resolved=true|false` narrows the list.
pub(crate) async fn list_flags_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(err) = authenticate(&state, &headers) {
        return api_error_response(err);
    }
    let id = match DocId::parse(&id) {
        Ok(id) => id,
        Err(err) => return api_error_response(ApiError::invalid_param("id", &err.to_string())),
    };
    let resolved = match params.get("resolved").map(String::as_str) {
        None => None,
        Some("true") => Some(true),
        Some("false") => Some(false),
        Some(_) => {
            return api_error_response(ApiError::invalid_param(
                "resolved",
                "must be true or false",
            ));
        }
    };
    match state.store.list_flags_for_vehicle(&id, resolved) {
        Ok(items) => Json(items.iter().map(flag_view).collect::<Vec<_>>()).into_response(),
        Err(err) => store_failure("list_flags_for_vehicle", &err),
    }
}

pub(crate) async fn resolve_flag_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<ResolveFlagRequest>,
) -> Response {
    if !admin_authorized(&state, &headers) {
        return api_error_response(ApiError::forbidden());
    }
    let id = match DocId::parse(&id) {
        Ok(id) => id,
        Err(err) => return api_error_response(ApiError::invalid_param("id", &err.to_string())),
    };
    let flag = match state.store.resolve_flag(&id, req.notes, now_utc()) {
        Ok(flag) => flag,
        Err(StoreError::NotFound(_)) => {
            return api_error_response(ApiError::not_found("fraud flag"));
        }
        Err(err) => return store_failure("resolve_flag", &err),
    };
    audit::record(
        &state,
        None,
        "FraudFlag",
        flag.id.as_str(),
        AuditAction::Update,
        Value::Null,
        json!({"resolved": true, "notes": flag.resolution_notes}),
        Some("flag resolved"),
    );
    Json(flag_view(&flag)).into_response()
}

/// Admin-only view over the append-only audit trail, newest first.
pub(crate) async fn list_audit_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if !admin_authorized(&state, &headers) {
        return api_error_response(ApiError::forbidden());
    }
    let page = match parse_page_params(
        &params,
        state.api.default_page_limit,
        state.api.max_page_limit,
    ) {
        Ok(page) => page,
        Err(err) => return api_error_response(err),
    };
    match state.store.list_audit(page.limit, page.offset) {
        Ok(result) => Json(Paged {
            items: result.items,
            total: result.total,
            limit: result.limit,
            offset: result.offset,
        })
        .into_response(),
        Err(err) => store_failure("list_audit", &err),
    }
}
