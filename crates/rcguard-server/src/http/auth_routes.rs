use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use rcguard_api::{user_view, ApiError, AuthResponse, SignInRequest, SignUpRequest};
use rcguard_core::{now_utc, unix_seconds};
use rcguard_model::{AuditAction, DocId, Email, User};
use serde_json::Value;
use tracing::info;

use crate::auth::{jwt, password, Claims};
use crate::{api_error_response, audit, store_failure, AppState};

const INVALID_CREDENTIALS: &str = "invalid email or password";

fn issue_token(state: &AppState, user: &User) -> Result<String, Response> {
    let now = unix_seconds();
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.to_string(),
        role: user.role.as_str().to_string(),
        iat: now,
        exp: now + state.api.jwt_ttl_secs as i64,
    };
    jwt::issue(&claims, &state.api.jwt_secret).map_err(|err| {
        tracing::error!(error = %err, "token issue failed");
        api_error_response(ApiError::internal())
    })
}

pub(crate) async fn signup_handler(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Response {
    let email = match Email::parse(&req.email) {
        Ok(email) => email,
        Err(err) => {
            return api_error_response(ApiError::validation_failed(err.to_string()));
        }
    };
    if req.password.chars().count() < state.api.min_password_len {
        return api_error_response(ApiError::validation_failed(format!(
            "password must be at least {} characters",
            state.api.min_password_len
        )));
    }
    match state.store.email_exists(&email) {
        Ok(true) => {
            return api_error_response(ApiError::conflict("email already registered"));
        }
        Ok(false) => {}
        Err(err) => return store_failure("email_exists", &err),
    }

    let salt = state.ids.next_id("salt");
    let hash = match password::hash_password(&req.password, state.api.pbkdf2_iterations, &salt) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!(error = %err, "password hash failed");
            return api_error_response(ApiError::internal());
        }
    };
    let Ok(id) = DocId::parse(&state.ids.next_id("users")) else {
        return api_error_response(ApiError::internal());
    };
    let full_name = req
        .full_name
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let user = User::new(id, email, hash, full_name, now_utc());

    match state.store.insert_user(&user) {
        Ok(()) => {}
        Err(rcguard_store::StoreError::Duplicate(_)) => {
            return api_error_response(ApiError::conflict("email already registered"));
        }
        Err(err) => return store_failure("insert_user", &err),
    }

    let view = user_view(&user);
    audit::record(
        &state,
        Some(user.id.clone()),
        "User",
        user.id.as_str(),
        AuditAction::Create,
        Value::Null,
        serde_json::to_value(&view).unwrap_or(Value::Null),
        Some("signup"),
    );
    info!(user = %user.id, "account created");

    let token = match issue_token(&state, &user) {
        Ok(token) => token,
        Err(response) => return response,
    };
    (
        StatusCode::CREATED,
        Json(AuthResponse {
            token: Some(token),
            message: "Account created successfully".to_string(),
            user: Some(view),
        }),
    )
        .into_response()
}

pub(crate) async fn signin_handler(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Response {
    // Unknown email, bad password, and disabled account all answer the
    // same way so the endpoint is not an account oracle.
    let Ok(email) = Email::parse(&req.email) else {
        return api_error_response(ApiError::unauthorized(INVALID_CREDENTIALS));
    };
    let user = match state.store.find_user_by_email(&email) {
        Ok(Some(user)) => user,
        Ok(None) => {
            return api_error_response(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        Err(err) => return store_failure("find_user_by_email", &err),
    };
    if !user.can_sign_in() {
        return api_error_response(ApiError::unauthorized(INVALID_CREDENTIALS));
    }
    match password::verify_password(&req.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            return api_error_response(ApiError::unauthorized(INVALID_CREDENTIALS));
        }
        Err(err) => {
            tracing::error!(error = %err, user = %user.id, "stored password hash unreadable");
            return api_error_response(ApiError::internal());
        }
    }

    let token = match issue_token(&state, &user) {
        Ok(token) => token,
        Err(response) => return response,
    };
    info!(user = %user.id, "signed in");
    Json(AuthResponse {
        token: Some(token),
        message: "Signed in successfully".to_string(),
        user: Some(user_view(&user)),
    })
    .into_response()
}

/// Tokens are stateless; logout exists so clients have a uniform call to
/// drop their session against.
pub(crate) async fn logout_handler() -> Response {
    Json(AuthResponse {
        token: None,
        message: "Signed out".to_string(),
        user: None,
    })
    .into_response()
}
