// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod convert;
mod dto;
mod errors;
mod params;

pub use convert::{flag_view, fraud_report_view, user_view, vehicle_view, verification_view};
pub use dto::{
    error_envelope, AuthResponse, FlagView, FraudCheckRequest, FraudCheckView, FraudCheckViewItem,
    Paged, ResolveFlagRequest, SignInRequest, SignUpRequest, UserView, VehicleUpsert, VehicleView,
    VerificationView,
};
pub use errors::{ApiError, ApiErrorCode};
pub use params::{parse_page_params, parse_rc_param, PageParams, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
