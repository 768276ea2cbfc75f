// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod audit;
mod fraud_flag;
mod keys;
mod user;
mod vehicle;
mod verification;

pub use audit::{AuditAction, AuditLog, AuditStatus};
pub use fraud_flag::{FlagType, FraudFlag};
pub use keys::{ChassisNumber, DocId, Email, EngineNumber, ParseError, RcNumber};
pub use user::{Role, User};
pub use vehicle::{Insurance, Owner, Puc, RegistrationInfo, Vehicle, VehicleInfo};
pub use verification::{Verification, VerificationType};
