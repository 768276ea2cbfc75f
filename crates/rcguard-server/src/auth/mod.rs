pub(crate) mod jwt;
pub(crate) mod password;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use rcguard_api::ApiError;
use rcguard_core::unix_seconds;
use rcguard_model::{DocId, User};
use tracing::error;

use crate::AppState;

pub(crate) use jwt::Claims;

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

/// Resolves the caller from the bearer token. The user record is loaded so
/// tokens for deactivated or soft-deleted accounts stop working immediately.
pub(crate) fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<User, ApiError> {
    let token = bearer_token(headers)
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
    let claims = jwt::verify(token, &state.api.jwt_secret, unix_seconds())
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;
    let id = DocId::parse(&claims.sub)
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))?;
    let user = state
        .store
        .find_user_by_id(&id)
        .map_err(|err| {
            error!(error = %err, "user lookup failed during auth");
            ApiError::internal()
        })?
        .ok_or_else(|| ApiError::unauthorized("invalid or expired token"))?;
    if !user.can_sign_in() {
        return Err(ApiError::unauthorized("account disabled"));
    }
    Ok(user)
}

/// Best-effort variant for routes that stay public but record who asked.
pub(crate) fn maybe_authenticate(state: &AppState, headers: &HeaderMap) -> Option<User> {
    bearer_token(headers)?;
    authenticate(state, headers).ok()
}

/// Admin writes require the shared key header. With no key configured,
/// every admin request is refused.
pub(crate) fn admin_authorized(state: &AppState, headers: &HeaderMap) -> bool {
    let Some(expected) = state.api.admin_key.as_deref() else {
        return false;
    };
    headers
        .get("x-admin-key")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .is_some_and(|presented| {
            password::constant_time_eq(presented.as_bytes(), expected.as_bytes())
        })
}
