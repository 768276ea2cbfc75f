// SPDX-License-Identifier: Apache-2.0

//! Deterministic fraud scoring for stored vehicle records.
//!
//! The engine is a pure function over [`FraudSignals`]: callers gather the
//! duplicate counts, expiry dates, and flags up front, so the same signals
//! always produce the same report. Each triggered check contributes a fixed
//! weight; the sum is capped at 1.0 and mapped to a three-way verdict.

#![forbid(unsafe_code)]

use chrono::NaiveDate;
use rcguard_model::FlagType;
use serde::{Deserialize, Serialize};

pub const WEIGHT_DUPLICATE_CHASSIS: f64 = 0.4;
pub const WEIGHT_DUPLICATE_ENGINE: f64 = 0.4;
pub const WEIGHT_EXPIRED_INSURANCE: f64 = 0.2;
pub const WEIGHT_EXPIRED_PUC: f64 = 0.1;
pub const WEIGHT_SUSPICIOUS: f64 = 0.4;
pub const WEIGHT_STOLEN: f64 = 1.0;
pub const WEIGHT_EXPIRED_REGISTRATION: f64 = 0.3;

/// Verdict threshold: strictly above this is `suspicious`.
pub const SUSPICIOUS_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Verified,
    Concerns,
    Suspicious,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Concerns => "concerns",
            Self::Suspicious => "suspicious",
        }
    }
}

/// Everything the scoring function is allowed to look at.
///
/// `chassis_count` / `engine_count` are the number of live records sharing
/// the serial, including the vehicle under check, so 1 means unique.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FraudSignals {
    pub chassis_count: u64,
    pub engine_count: u64,
    pub insurance_valid_till: Option<NaiveDate>,
    pub puc_valid_till: Option<NaiveDate>,
    pub registration_valid_till: Option<NaiveDate>,
    pub stolen: bool,
    pub suspicious: bool,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudCheck {
    pub flag_type: FlagType,
    pub message: String,
    pub severity: Severity,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudReport {
    pub checks: Vec<FraudCheck>,
    /// Sum of triggered weights, capped at 1.0.
    pub score: f64,
    pub verdict: Verdict,
}

/// Runs the full battery of heuristic checks over one set of signals.
#[must_use]
pub fn evaluate(signals: &FraudSignals) -> FraudReport {
    let mut checks = Vec::new();
    let mut score = 0.0_f64;

    if signals.chassis_count > 1 {
        checks.push(FraudCheck {
            flag_type: FlagType::DuplicateChassis,
            message: format!(
                "Chassis number found in {} vehicles",
                signals.chassis_count
            ),
            severity: Severity::High,
            weight: WEIGHT_DUPLICATE_CHASSIS,
        });
        score += WEIGHT_DUPLICATE_CHASSIS;
    }

    if signals.engine_count > 1 {
        checks.push(FraudCheck {
            flag_type: FlagType::DuplicateEngine,
            message: format!("Engine number found in {} vehicles", signals.engine_count),
            severity: Severity::High,
            weight: WEIGHT_DUPLICATE_ENGINE,
        });
        score += WEIGHT_DUPLICATE_ENGINE;
    }

    if expired(signals.insurance_valid_till, signals.today) {
        checks.push(FraudCheck {
            flag_type: FlagType::ExpiredInsurance,
            message: "Vehicle insurance has expired".to_string(),
            severity: Severity::Medium,
            weight: WEIGHT_EXPIRED_INSURANCE,
        });
        score += WEIGHT_EXPIRED_INSURANCE;
    }

    if expired(signals.puc_valid_till, signals.today) {
        checks.push(FraudCheck {
            flag_type: FlagType::ExpiredPuc,
            message: "Pollution certificate has expired".to_string(),
            severity: Severity::Low,
            weight: WEIGHT_EXPIRED_PUC,
        });
        score += WEIGHT_EXPIRED_PUC;
    }

    if signals.suspicious {
        checks.push(FraudCheck {
            flag_type: FlagType::SuspiciousVehicle,
            message: "Vehicle marked as suspicious".to_string(),
            severity: Severity::High,
            weight: WEIGHT_SUSPICIOUS,
        });
        score += WEIGHT_SUSPICIOUS;
    }

    if signals.stolen {
        checks.push(FraudCheck {
            flag_type: FlagType::StolenVehicle,
            message: "Vehicle reported as stolen".to_string(),
            severity: Severity::Critical,
            weight: WEIGHT_STOLEN,
        });
        score += WEIGHT_STOLEN;
    }

    if expired(signals.registration_valid_till, signals.today) {
        checks.push(FraudCheck {
            flag_type: FlagType::ExpiredRegistration,
            message: "Vehicle registration has expired".to_string(),
            severity: Severity::High,
            weight: WEIGHT_EXPIRED_REGISTRATION,
        });
        score += WEIGHT_EXPIRED_REGISTRATION;
    }

    let score = score.min(1.0);
    let verdict = if score > SUSPICIOUS_THRESHOLD {
        Verdict::Suspicious
    } else if score > 0.0 {
        Verdict::Concerns
    } else {
        Verdict::Verified
    };

    FraudReport {
        checks,
        score,
        verdict,
    }
}

/// A certificate valid through today is not expired; only strictly earlier
/// dates trigger. Absent dates never trigger.
fn expired(valid_till: Option<NaiveDate>, today: NaiveDate) -> bool {
    valid_till.is_some_and(|date| date < today)
}
