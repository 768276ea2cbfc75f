// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{ChassisNumber, DocId, EngineNumber, ParseError, RcNumber};

pub const MIN_MANUFACTURE_YEAR: i32 = 1900;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Owner {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub aadhaar_last4: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct VehicleInfo {
    pub r#type: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub fuel_type: Option<String>,
    pub color: Option<String>,
    pub manufacture_year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RegistrationInfo {
    pub registration_date: Option<NaiveDate>,
    pub valid_till: Option<NaiveDate>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Insurance {
    pub provider: Option<String>,
    pub policy_number: Option<String>,
    pub valid_till: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Puc {
    pub certificate_number: Option<String>,
    pub valid_till: Option<NaiveDate>,
}

/// A stored vehicle registration record.
///
/// `deleted_at` implements soft delete: a set timestamp hides the record from
/// every live read path without destroying history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Vehicle {
    pub id: DocId,
    pub rc_number: RcNumber,
    pub qr_code_id: Option<String>,
    pub owners_count: u32,
    pub previous_owners: Vec<String>,
    pub owner: Owner,
    pub vehicle_info: VehicleInfo,
    pub chassis_number: ChassisNumber,
    pub engine_number: EngineNumber,
    pub registration_state: Option<String>,
    pub registration_info: RegistrationInfo,
    pub insurance: Option<Insurance>,
    pub puc: Option<Puc>,
    pub stolen: bool,
    pub suspicious: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Vehicle {
    #[must_use]
    pub fn new(
        id: DocId,
        rc_number: RcNumber,
        chassis_number: ChassisNumber,
        engine_number: EngineNumber,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            rc_number,
            qr_code_id: None,
            owners_count: 1,
            previous_owners: Vec::new(),
            owner: Owner::default(),
            vehicle_info: VehicleInfo::default(),
            chassis_number,
            engine_number,
            registration_state: None,
            registration_info: RegistrationInfo {
                active: Some(true),
                ..RegistrationInfo::default()
            },
            insurance: None,
            puc: None,
            stolen: false,
            suspicious: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn validate(&self) -> Result<(), ParseError> {
        if let Some(year) = self.vehicle_info.manufacture_year {
            if year < MIN_MANUFACTURE_YEAR {
                return Err(ParseError::InvalidFormat(
                    "manufacture year must be 1900 or later",
                ));
            }
        }
        if let (Some(reg), Some(valid)) = (
            self.registration_info.registration_date,
            self.registration_info.valid_till,
        ) {
            if valid < reg {
                return Err(ParseError::InvalidFormat(
                    "registration valid_till precedes registration date",
                ));
            }
        }
        Ok(())
    }
}
