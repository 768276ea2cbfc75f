use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rcguard_api::{
    fraud_report_view, parse_page_params, parse_rc_param, vehicle_view, verification_view,
    ApiError, ApiErrorCode, FraudCheckRequest, Paged,
};
use rcguard_core::{now_utc, today_utc};
use rcguard_fraud::{evaluate, FraudReport, FraudSignals};
use rcguard_model::{
    AuditAction, DocId, FraudFlag, User, Vehicle, Verification, VerificationType,
};
use rcguard_store::{DocumentStore, StoreError};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use tracing::warn;

use crate::auth::{authenticate, maybe_authenticate};
use crate::{api_error_response, audit, store_failure, AppState};

pub(crate) fn gather_signals(
    store: &DocumentStore,
    vehicle: &Vehicle,
) -> Result<FraudSignals, StoreError> {
    Ok(FraudSignals {
        chassis_count: store.count_by_chassis(&vehicle.chassis_number)?,
        engine_count: store.count_by_engine(&vehicle.engine_number)?,
        insurance_valid_till: vehicle.insurance.as_ref().and_then(|i| i.valid_till),
        puc_valid_till: vehicle.puc.as_ref().and_then(|p| p.valid_till),
        registration_valid_till: vehicle.registration_info.valid_till,
        stolen: vehicle.stolen,
        suspicious: vehicle.suspicious,
        today: today_utc(),
    })
}

fn record_verification(state: &AppState, vehicle: &Vehicle, user: &User, report: &FraudReport) {
    let Ok(id) = DocId::parse(&state.ids.next_id("verifications")) else {
        warn!("verification id generation failed");
        return;
    };
    let verification = Verification::new(
        id,
        vehicle.id.clone(),
        user.id.clone(),
        VerificationType::ManualSearch,
        report.verdict.as_str().to_string(),
        report.score,
        now_utc(),
    );
    if let Err(err) = state.store.insert_verification(&verification) {
        warn!(error = %err, vehicle = %vehicle.id, "verification insert failed");
    }
}

/// Public RC lookup. When the caller carries a valid token the lookup is
/// additionally logged as a manual-search verification with the current
/// fraud verdict for that vehicle.
pub(crate) async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let rc = match parse_rc_param(&params) {
        Ok(rc) => rc,
        Err(err) => return api_error_response(err),
    };
    let vehicle = match state.store.find_vehicle_by_rc(&rc) {
        Ok(Some(vehicle)) => vehicle,
        Ok(None) => {
            return api_error_response(ApiError::new(
                ApiErrorCode::NotFound,
                "RC number not found in database",
                json!({"rcNumber": rc.as_str()}),
            ));
        }
        Err(err) => return store_failure("find_vehicle_by_rc", &err),
    };

    if let Some(user) = maybe_authenticate(&state, &headers) {
        match gather_signals(&state.store, &vehicle) {
            Ok(signals) => record_verification(&state, &vehicle, &user, &evaluate(&signals)),
            Err(err) => warn!(error = %err, "signal gather failed during search logging"),
        }
    }

    Json(vehicle_view(&vehicle)).into_response()
}

/// Runs every fraud check against one vehicle and persists the outcome:
/// a verification row plus one fraud flag per triggered check.
pub(crate) async fn fraud_check_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<FraudCheckRequest>,
) -> Response {
    let user = match authenticate(&state, &headers) {
        Ok(user) => user,
        Err(err) => return api_error_response(err),
    };
    let id = match DocId::parse(&req.vehicle_id) {
        Ok(id) => id,
        Err(err) => {
            return api_error_response(ApiError::invalid_param("vehicleId", &err.to_string()));
        }
    };
    let vehicle = match state.store.find_vehicle_by_id(&id) {
        Ok(Some(vehicle)) => vehicle,
        Ok(None) => return api_error_response(ApiError::not_found("vehicle")),
        Err(err) => return store_failure("find_vehicle_by_id", &err),
    };

    let signals = match gather_signals(&state.store, &vehicle) {
        Ok(signals) => signals,
        Err(err) => return store_failure("gather_signals", &err),
    };
    let report = evaluate(&signals);
    state
        .metrics
        .fraud_checks_total
        .fetch_add(1, Ordering::Relaxed);

    record_verification(&state, &vehicle, &user, &report);
    let now = now_utc();
    for check in &report.checks {
        let Ok(flag_id) = DocId::parse(&state.ids.next_id("fraud_flags")) else {
            warn!("flag id generation failed");
            continue;
        };
        let flag = FraudFlag::new(
            flag_id,
            vehicle.id.clone(),
            check.flag_type,
            check.message.clone(),
            report.score,
            Some(user.id.clone()),
            now,
        );
        if let Err(err) = state.store.insert_fraud_flag(&flag) {
            warn!(error = %err, vehicle = %vehicle.id, "fraud flag insert failed");
        }
    }
    audit::record(
        &state,
        Some(user.id.clone()),
        "Vehicle",
        vehicle.id.as_str(),
        AuditAction::Read,
        Value::Null,
        json!({"fraudScore": report.score, "result": report.verdict.as_str()}),
        Some("fraud check"),
    );

    Json(fraud_report_view(&report)).into_response()
}

pub(crate) async fn list_vehicles_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(err) = authenticate(&state, &headers) {
        return api_error_response(err);
    }
    let page = match parse_page_params(
        &params,
        state.api.default_page_limit,
        state.api.max_page_limit,
    ) {
        Ok(page) => page,
        Err(err) => return api_error_response(err),
    };
    match state.store.list_vehicles(page.limit, page.offset) {
        Ok(result) => Json(Paged {
            items: result.items.iter().map(vehicle_view).collect::<Vec<_>>(),
            total: result.total,
            limit: result.limit,
            offset: result.offset,
        })
        .into_response(),
        Err(err) => store_failure("list_vehicles", &err),
    }
}

pub(crate) async fn list_verifications_handler(
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
    let page = match parse_page_params(
        &params,
        state.api.default_page_limit,
        state.api.max_page_limit,
    ) {
        Ok(page) => page,
        Err(err) => return api_error_response(err),
    };
    match state
        .store
        .list_verifications_for_vehicle(&id, page.limit, page.offset)
    {
        Ok(items) => {
            Json(items.iter().map(verification_view).collect::<Vec<_>>()).into_response()
        }
        Err(err) => store_failure("list_verifications_for_vehicle", &err),
    }
}
