// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::keys::{DocId, ParseError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    DuplicateChassis,
    DuplicateEngine,
    ExpiredInsurance,
    ExpiredPuc,
    SuspiciousVehicle,
    StolenVehicle,
    ExpiredRegistration,
}

impl FlagType {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        match raw {
            "duplicate_chassis" => Ok(Self::DuplicateChassis),
            "duplicate_engine" => Ok(Self::DuplicateEngine),
            "expired_insurance" => Ok(Self::ExpiredInsurance),
            "expired_puc" => Ok(Self::ExpiredPuc),
            "suspicious_vehicle" => Ok(Self::SuspiciousVehicle),
            "stolen_vehicle" => Ok(Self::StolenVehicle),
            "expired_registration" => Ok(Self::ExpiredRegistration),
            _ => Err(ParseError::InvalidFormat("unknown fraud flag type")),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DuplicateChassis => "duplicate_chassis",
            Self::DuplicateEngine => "duplicate_engine",
            Self::ExpiredInsurance => "expired_insurance",
            Self::ExpiredPuc => "expired_puc",
            Self::SuspiciousVehicle => "suspicious_vehicle",
            Self::StolenVehicle => "stolen_vehicle",
            Self::ExpiredRegistration => "expired_registration",
        }
    }
}

/// A persisted outcome of one triggered fraud check. Flags stay unresolved
/// until an operator closes them with notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FraudFlag {
    pub id: DocId,
    pub vehicle_id: DocId,
    /// Score of the check run that produced this flag, in [0, 1].
    pub fraud_score: f64,
    pub flagged_by: Option<DocId>,
    pub flag_type: FlagType,
    pub description: String,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl FraudFlag {
    #[must_use]
    pub fn new(
        id: DocId,
        vehicle_id: DocId,
        flag_type: FlagType,
        description: String,
        fraud_score: f64,
        flagged_by: Option<DocId>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            fraud_score,
            flagged_by,
            flag_type,
            description,
            resolved: false,
            resolved_at: None,
            resolution_notes: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn resolve(&mut self, notes: Option<String>, now: DateTime<Utc>) {
        self.resolved = true;
        self.resolved_at = Some(now);
        self.resolution_notes = notes;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_type_round_trips() {
        for t in [
            FlagType::DuplicateChassis,
            FlagType::DuplicateEngine,
            FlagType::ExpiredInsurance,
            FlagType::ExpiredPuc,
            FlagType::SuspiciousVehicle,
            FlagType::StolenVehicle,
            FlagType::ExpiredRegistration,
        ] {
            assert_eq!(FlagType::parse(t.as_str()).expect("parse"), t);
        }
    }

    #[test]
    fn resolve_sets_timestamp_and_notes() {
        let gen = rcguard_core::IdGenerator::new();
        let now = rcguard_core::now_utc();
        let mut flag = FraudFlag::new(
            DocId::parse(&gen.next_id("flags")).expect("id"),
            DocId::parse(&gen.next_id("vehicles")).expect("id"),
            FlagType::StolenVehicle,
            "Vehicle reported as stolen".to_string(),
            1.0,
            None,
            now,
        );
        assert!(!flag.resolved);
        flag.resolve(Some("recovered".to_string()), now);
        assert!(flag.resolved);
        assert_eq!(flag.resolved_at, Some(now));
        assert_eq!(flag.resolution_notes.as_deref(), Some("recovered"));
    }
}
