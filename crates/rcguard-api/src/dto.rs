// SPDX-License-Identifier: Apache-2.0

//! Wire shapes. Field names follow the original public API (camelCase);
//! conversion from the domain models lives in `convert`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: Option<String>,
    pub message: String,
    pub user: Option<UserView>,
}

/// Admin upsert payload. The nested blocks reuse the model's own serde
/// shapes; keys and serials are re-validated on the way in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleUpsert {
    pub rc_number: String,
    pub chassis_number: String,
    pub engine_number: String,
    #[serde(default)]
    pub qr_code_id: Option<String>,
    #[serde(default)]
    pub owners_count: Option<u32>,
    #[serde(default)]
    pub previous_owners: Vec<String>,
    #[serde(default)]
    pub owner: Option<rcguard_model::Owner>,
    #[serde(default)]
    pub vehicle_info: Option<rcguard_model::VehicleInfo>,
    #[serde(default)]
    pub registration_state: Option<String>,
    #[serde(default)]
    pub registration_info: Option<rcguard_model::RegistrationInfo>,
    #[serde(default)]
    pub insurance: Option<rcguard_model::Insurance>,
    #[serde(default)]
    pub puc: Option<rcguard_model::Puc>,
    #[serde(default)]
    pub stolen: Option<bool>,
    #[serde(default)]
    pub suspicious: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleView {
    pub id: String,
    pub rc_number: String,
    pub qr_code_id: Option<String>,
    pub owners_count: u32,
    pub previous_owners: Vec<String>,
    pub owner: rcguard_model::Owner,
    pub vehicle_info: rcguard_model::VehicleInfo,
    pub chassis_number: String,
    pub engine_number: String,
    pub registration_state: Option<String>,
    pub registration_info: rcguard_model::RegistrationInfo,
    pub insurance: Option<rcguard_model::Insurance>,
    pub puc: Option<rcguard_model::Puc>,
    pub stolen: bool,
    pub suspicious: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheckRequest {
    pub vehicle_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheckViewItem {
    pub r#type: String,
    pub message: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FraudCheckView {
    pub fraud_checks: Vec<FraudCheckViewItem>,
    pub fraud_score: f64,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationView {
    pub id: String,
    pub vehicle_id: String,
    pub verified_by: String,
    pub verification_type: String,
    pub result: String,
    pub fraud_score: f64,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagView {
    pub id: String,
    pub vehicle_id: String,
    pub flag_type: String,
    pub fraud_score: f64,
    pub description: String,
    pub resolved: bool,
    pub resolution_notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveFlagRequest {
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
}

/// Wire envelope for errors: `{"error": {...}}`.
#[must_use]
pub fn error_envelope(err: &crate::ApiError) -> Value {
    serde_json::json!({ "error": err })
}
