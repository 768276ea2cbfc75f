// SPDX-License-Identifier: Apache-2.0

use rcguard_core::to_rfc3339;
use rcguard_fraud::FraudReport;
use rcguard_model::{FlagType, FraudFlag, User, Vehicle, Verification};

use crate::dto::{
    FlagView, FraudCheckView, FraudCheckViewItem, UserView, VehicleView, VerificationView,
};

/// Human-facing check labels, matching the original report wording.
#[must_use]
pub(crate) fn flag_label(flag_type: FlagType) -> &'static str {
    match flag_type {
        FlagType::DuplicateChassis => "Duplicate Chassis",
        FlagType::DuplicateEngine => "Duplicate Engine",
        FlagType::ExpiredInsurance => "Expired Insurance",
        FlagType::ExpiredPuc => "Expired PUC",
        FlagType::SuspiciousVehicle => "Suspicious Vehicle",
        FlagType::StolenVehicle => "Stolen Vehicle",
        FlagType::ExpiredRegistration => "Expired Registration",
    }
}

/// Strips the password hash; everything else passes through.
#[must_use]
pub fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id.to_string(),
        email: user.email.to_string(),
        full_name: user.full_name.clone(),
        role: user.role.as_str().to_string(),
        is_active: user.is_active,
        created_at: to_rfc3339(user.created_at),
    }
}

#[must_use]
pub fn vehicle_view(vehicle: &Vehicle) -> VehicleView {
    VehicleView {
        id: vehicle.id.to_string(),
        rc_number: vehicle.rc_number.to_string(),
        qr_code_id: vehicle.qr_code_id.clone(),
        owners_count: vehicle.owners_count,
        previous_owners: vehicle.previous_owners.clone(),
        owner: vehicle.owner.clone(),
        vehicle_info: vehicle.vehicle_info.clone(),
        chassis_number: vehicle.chassis_number.as_str().to_string(),
        engine_number: vehicle.engine_number.as_str().to_string(),
        registration_state: vehicle.registration_state.clone(),
        registration_info: vehicle.registration_info.clone(),
        insurance: vehicle.insurance.clone(),
        puc: vehicle.puc.clone(),
        stolen: vehicle.stolen,
        suspicious: vehicle.suspicious,
        created_at: to_rfc3339(vehicle.created_at),
        updated_at: to_rfc3339(vehicle.updated_at),
    }
}

#[must_use]
pub fn fraud_report_view(report: &FraudReport) -> FraudCheckView {
    FraudCheckView {
        fraud_checks: report
            .checks
            .iter()
            .map(|check| FraudCheckViewItem {
                r#type: flag_label(check.flag_type).to_string(),
                message: check.message.clone(),
                severity: check.severity.as_str().to_string(),
            })
            .collect(),
        fraud_score: report.score,
        result: report.verdict.as_str().to_string(),
    }
}

#[must_use]
pub fn verification_view(verification: &Verification) -> VerificationView {
    VerificationView {
        id: verification.id.to_string(),
        vehicle_id: verification.vehicle_id.to_string(),
        verified_by: verification.verified_by.to_string(),
        verification_type: verification.verification_type.as_str().to_string(),
        result: verification.result.clone(),
        fraud_score: verification.fraud_score,
        created_at: to_rfc3339(verification.created_at),
    }
}

#[must_use]
pub fn flag_view(flag: &FraudFlag) -> FlagView {
    FlagView {
        id: flag.id.to_string(),
        vehicle_id: flag.vehicle_id.to_string(),
        flag_type: flag.flag_type.as_str().to_string(),
        fraud_score: flag.fraud_score,
        description: flag.description.clone(),
        resolved: flag.resolved,
        resolution_notes: flag.resolution_notes.clone(),
        created_at: to_rfc3339(flag.created_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rcguard_fraud::{evaluate, FraudSignals};
    use rcguard_model::{ChassisNumber, DocId, Email, EngineNumber, RcNumber};

    #[test]
    fn user_view_carries_no_password_material() {
        let gen = rcguard_core::IdGenerator::new();
        let user = User::new(
            DocId::parse(&gen.next_id("users")).expect("id"),
            Email::parse("a@example.com").expect("email"),
            "pbkdf2-sha256$1000$aa$bb".to_string(),
            "A".to_string(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        );
        let view = user_view(&user);
        let text = serde_json::to_string(&view).expect("serialize");
        assert!(!text.contains("pbkdf2"));
        assert!(!text.contains("password"));
        assert_eq!(view.created_at, "2024-01-01T00:00:00.000Z");
    }

    #[test]
    fn fraud_report_view_uses_original_labels() {
        let signals = FraudSignals {
            chassis_count: 2,
            engine_count: 1,
            insurance_valid_till: NaiveDate::from_ymd_opt(2000, 1, 1),
            puc_valid_till: None,
            registration_valid_till: None,
            stolen: false,
            suspicious: false,
            today: NaiveDate::from_ymd_opt(2024, 6, 1).expect("today"),
        };
        let view = fraud_report_view(&evaluate(&signals));
        let types: Vec<&str> = view.fraud_checks.iter().map(|c| c.r#type.as_str()).collect();
        assert_eq!(types, vec!["Duplicate Chassis", "Expired Insurance"]);
        assert_eq!(view.result, "suspicious");
    }

    #[test]
    fn vehicle_view_round_trips_serials_as_strings() {
        let gen = rcguard_core::IdGenerator::new();
        let vehicle = Vehicle::new(
            DocId::parse(&gen.next_id("vehicles")).expect("id"),
            RcNumber::parse("MH12AB1234").expect("rc"),
            ChassisNumber::parse("CH-A").expect("chassis"),
            EngineNumber::parse("EN-A").expect("engine"),
            Utc::now(),
        );
        let view = vehicle_view(&vehicle);
        assert_eq!(view.rc_number, "MH12AB1234");
        assert_eq!(view.chassis_number, "CH-A");
    }
}
