//! RC registry routes. Reads are public; create, update, and delete are
//! gated on the shared admin key header.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use rcguard_api::{
    parse_page_params, parse_rc_param, vehicle_view, ApiError, Paged, VehicleUpsert,
};
use rcguard_core::now_utc;
use rcguard_model::{
    AuditAction, ChassisNumber, DocId, EngineNumber, RcNumber, Vehicle,
};
use rcguard_store::StoreError;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

use crate::auth::admin_authorized;
use crate::{api_error_response, audit, store_failure, AppState};

/// Merges the request onto a vehicle record. Absent fields keep their
/// stored values; identity keys are handled by the callers.
fn apply_upsert(vehicle: &mut Vehicle, req: &VehicleUpsert) {
    if let Some(qr) = req.qr_code_id.clone() {
        vehicle.qr_code_id = Some(qr);
    }
    if let Some(count) = req.owners_count {
        vehicle.owners_count = count;
    }
    if !req.previous_owners.is_empty() {
        vehicle.previous_owners = req.previous_owners.clone();
    }
    if let Some(owner) = req.owner.clone() {
        vehicle.owner = owner;
    }
    if let Some(info) = req.vehicle_info.clone() {
        vehicle.vehicle_info = info;
    }
    if let Some(st) = req.registration_state.clone() {
        vehicle.registration_state = Some(st);
    }
    if let Some(reg) = req.registration_info.clone() {
        vehicle.registration_info = reg;
    }
    if let Some(ins) = req.insurance.clone() {
        vehicle.insurance = Some(ins);
    }
    if let Some(puc) = req.puc.clone() {
        vehicle.puc = Some(puc);
    }
    if let Some(stolen) = req.stolen {
        vehicle.stolen = stolen;
    }
    if let Some(suspicious) = req.suspicious {
        vehicle.suspicious = suspicious;
    }
}

fn parse_keys(
    req: &VehicleUpsert,
) -> Result<(RcNumber, ChassisNumber, EngineNumber), ApiError> {
    let rc = RcNumber::parse(&req.rc_number)
        .map_err(|e| ApiError::validation_failed(format!("rcNumber: {e}")))?;
    let chassis = ChassisNumber::parse(&req.chassis_number)
        .map_err(|e| ApiError::validation_failed(format!("chassisNumber: {e}")))?;
    let engine = EngineNumber::parse(&req.engine_number)
        .map_err(|e| ApiError::validation_failed(format!("engineNumber: {e}")))?;
    Ok((rc, chassis, engine))
}

pub(crate) async fn list_rc_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
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

pub(crate) async fn search_rc_handler(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let rc = match parse_rc_param(&params) {
        Ok(rc) => rc,
        Err(err) => return api_error_response(err),
    };
    match state.store.find_vehicle_by_rc(&rc) {
        Ok(Some(vehicle)) => Json(vehicle_view(&vehicle)).into_response(),
        Ok(None) => api_error_response(ApiError::not_found("vehicle")),
        Err(err) => store_failure("find_vehicle_by_rc", &err),
    }
}

pub(crate) async fn get_rc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let id = match DocId::parse(&id) {
        Ok(id) => id,
        Err(err) => return api_error_response(ApiError::invalid_param("id", &err.to_string())),
    };
    match state.store.find_vehicle_by_id(&id) {
        Ok(Some(vehicle)) => Json(vehicle_view(&vehicle)).into_response(),
        Ok(None) => api_error_response(ApiError::not_found("vehicle")),
        Err(err) => store_failure("find_vehicle_by_id", &err),
    }
}

pub(crate) async fn create_rc_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<VehicleUpsert>,
) -> Response {
    if !admin_authorized(&state, &headers) {
        return api_error_response(ApiError::forbidden());
    }
    let (rc, chassis, engine) = match parse_keys(&req) {
        Ok(keys) => keys,
        Err(err) => return api_error_response(err),
    };
    let Ok(id) = DocId::parse(&state.ids.next_id("vehicles")) else {
        return api_error_response(ApiError::internal());
    };
    let mut vehicle = Vehicle::new(id, rc, chassis, engine, now_utc());
    apply_upsert(&mut vehicle, &req);
    if let Err(err) = vehicle.validate() {
        return api_error_response(ApiError::validation_failed(err.to_string()));
    }
    match state.store.insert_vehicle(&vehicle) {
        Ok(()) => {}
        Err(StoreError::Duplicate(_)) => {
            return api_error_response(ApiError::conflict("RC number already registered"));
        }
        Err(err) => return store_failure("insert_vehicle", &err),
    }
    let view = vehicle_view(&vehicle);
    audit::record(
        &state,
        None,
        "Vehicle",
        vehicle.id.as_str(),
        AuditAction::Create,
        Value::Null,
        serde_json::to_value(&view).unwrap_or(Value::Null),
        None,
    );
    info!(vehicle = %vehicle.id, rc = %vehicle.rc_number, "vehicle registered");
    (StatusCode::CREATED, Json(view)).into_response()
}

pub(crate) async fn update_rc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<VehicleUpsert>,
) -> Response {
    if !admin_authorized(&state, &headers) {
        return api_error_response(ApiError::forbidden());
    }
    let id = match DocId::parse(&id) {
        Ok(id) => id,
        Err(err) => return api_error_response(ApiError::invalid_param("id", &err.to_string())),
    };
    let mut vehicle = match state.store.find_vehicle_by_id(&id) {
        Ok(Some(vehicle)) => vehicle,
        Ok(None) => return api_error_response(ApiError::not_found("vehicle")),
        Err(err) => return store_failure("find_vehicle_by_id", &err),
    };
    let old_view = vehicle_view(&vehicle);
    let (rc, chassis, engine) = match parse_keys(&req) {
        Ok(keys) => keys,
        Err(err) => return api_error_response(err),
    };
    vehicle.rc_number = rc;
    vehicle.chassis_number = chassis;
    vehicle.engine_number = engine;
    apply_upsert(&mut vehicle, &req);
    vehicle.updated_at = now_utc();
    if let Err(err) = vehicle.validate() {
        return api_error_response(ApiError::validation_failed(err.to_string()));
    }
    match state.store.update_vehicle(&vehicle) {
        Ok(()) => {}
        Err(StoreError::NotFound(_)) => {
            return api_error_response(ApiError::not_found("vehicle"));
        }
        Err(StoreError::Duplicate(_)) => {
            return api_error_response(ApiError::conflict("RC number already registered"));
        }
        Err(err) => return store_failure("update_vehicle", &err),
    }
    let view = vehicle_view(&vehicle);
    audit::record(
        &state,
        None,
        "Vehicle",
        vehicle.id.as_str(),
        AuditAction::Update,
        serde_json::to_value(&old_view).unwrap_or(Value::Null),
        serde_json::to_value(&view).unwrap_or(Value::Null),
        None,
    );
    Json(view).into_response()
}

pub(crate) async fn delete_rc_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !admin_authorized(&state, &headers) {
        return api_error_response(ApiError::forbidden());
    }
    let id = match DocId::parse(&id) {
        Ok(id) => id,
        Err(err) => return api_error_response(ApiError::invalid_param("id", &err.to_string())),
    };
    let vehicle = match state.store.soft_delete_vehicle(&id, now_utc()) {
        Ok(vehicle) => vehicle,
        Err(StoreError::NotFound(_)) => {
            return api_error_response(ApiError::not_found("vehicle"));
        }
        Err(err) => return store_failure("soft_delete_vehicle", &err),
    };
    audit::record(
        &state,
        None,
        "Vehicle",
        vehicle.id.as_str(),
        AuditAction::Delete,
        serde_json::to_value(vehicle_view(&vehicle)).unwrap_or(Value::Null),
        Value::Null,
        None,
    );
    info!(vehicle = %vehicle.id, rc = %vehicle.rc_number, "vehicle soft-deleted");
    StatusCode::NO_CONTENT.into_response()
}
