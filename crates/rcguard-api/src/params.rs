// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;

use rcguard_model::RcNumber;

use crate::ApiError;

pub const DEFAULT_PAGE_LIMIT: u32 = 20;
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub limit: u32,
    pub offset: u64,
}

/// Parses `limit` and `offset` query params against the deployment's page
/// bounds. Out-of-range limits clamp rather than fail; non-numeric values
/// are rejected.
pub fn parse_page_params(
    params: &HashMap<String, String>,
    default_limit: u32,
    max_limit: u32,
) -> Result<PageParams, ApiError> {
    let limit = match params.get("limit") {
        None => default_limit.min(max_limit),
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ApiError::invalid_param("limit", "must be a non-negative integer"))?
            .clamp(1, max_limit),
    };
    let offset = match params.get("offset") {
        None => 0,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ApiError::invalid_param("offset", "must be a non-negative integer"))?,
    };
    Ok(PageParams { limit, offset })
}

/// The `rcNumber` query param, required and normalized.
pub fn parse_rc_param(params: &HashMap<String, String>) -> Result<RcNumber, ApiError> {
    let raw = params
        .get("rcNumber")
        .ok_or_else(|| ApiError::invalid_param("rcNumber", "missing"))?;
    RcNumber::parse(raw).map_err(|e| ApiError::invalid_param("rcNumber", &e.to_string()))
}
