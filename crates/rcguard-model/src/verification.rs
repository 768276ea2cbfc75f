// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{DocId, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum VerificationType {
    QrScan,
    ManualSearch,
    BatchCheck,
}

impl VerificationType {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "qr_scan" => Ok(Self::QrScan),
            "manual_search" => Ok(Self::ManualSearch),
            "batch_check" => Ok(Self::BatchCheck),
            _ => Err(ParseError::InvalidFormat(
                "verification type must be one of qr_scan, manual_search, batch_check",
            )),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::QrScan => "qr_scan",
            Self::ManualSearch => "manual_search",
            Self::BatchCheck => "batch_check",
        }
    }
}

/// One lookup or fraud-check event against a vehicle, recorded for history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Verification {
    pub id: DocId,
    pub vehicle_id: DocId,
    pub verified_by: DocId,
    pub verification_type: VerificationType,
    /// Verdict string: verified, concerns, or suspicious.
    pub result: String,
    pub fraud_score: f64,
    pub verification_ip: Option<String>,
    pub verification_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Verification {
    #[must_use]
    pub fn new(
        id: DocId,
        vehicle_id: DocId,
        verified_by: DocId,
        verification_type: VerificationType,
        result: String,
        fraud_score: f64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            verified_by,
            verification_type,
            result,
            fraud_score,
            verification_ip: None,
            verification_location: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}
