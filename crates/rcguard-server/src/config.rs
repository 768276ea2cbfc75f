use rcguard_api::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use serde::Serialize;

pub const CONFIG_SCHEMA_VERSION: &str = "1";

/// Flat service configuration, filled from the environment in `main`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub max_body_bytes: usize,
    /// Wall-clock budget for one request; exceeding it answers 504.
    pub request_timeout_secs: u64,
    /// HS256 signing secret for session tokens. Never serialized.
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_ttl_secs: u64,
    /// Shared key for admin write routes; admin routes refuse everything
    /// when unset.
    #[serde(skip_serializing)]
    pub admin_key: Option<String>,
    pub pbkdf2_iterations: u32,
    pub min_password_len: usize,
    pub cors_allowed_origins: Vec<String>,
    pub enable_audit_log: bool,
    /// Page size applied when a listing request carries no `limit`.
    pub default_page_limit: u32,
    /// Hard ceiling any requested `limit` clamps to.
    pub max_page_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout_secs: 30,
            jwt_secret: String::new(),
            jwt_ttl_secs: 86_400,
            admin_key: None,
            pbkdf2_iterations: 100_000,
            min_password_len: 6,
            cors_allowed_origins: Vec::new(),
            enable_audit_log: true,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            max_page_limit: MAX_PAGE_LIMIT,
        }
    }
}

pub fn validate_startup_config_contract(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if api.request_timeout_secs == 0 {
        return Err("request timeout must be > 0".to_string());
    }
    if api.jwt_secret.trim().is_empty() {
        return Err("jwt secret must be set and non-empty".to_string());
    }
    if api.jwt_ttl_secs == 0 {
        return Err("jwt ttl must be > 0".to_string());
    }
    if api.pbkdf2_iterations < 1_000 {
        return Err("pbkdf2 iterations must be >= 1000".to_string());
    }
    if api.min_password_len < 6 {
        return Err("min password length must be >= 6".to_string());
    }
    if api.admin_key.as_deref().is_some_and(|k| k.trim().is_empty()) {
        return Err("admin key, when set, must be non-empty".to_string());
    }
    if api.default_page_limit == 0 || api.max_page_limit == 0 {
        return Err("page limits must be > 0".to_string());
    }
    if api.default_page_limit > api.max_page_limit {
        return Err("default page limit must not exceed max page limit".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ApiConfig {
        ApiConfig {
            jwt_secret: "secret".to_string(),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn startup_config_validation_requires_jwt_secret() {
        let err = validate_startup_config_contract(&ApiConfig::default()).expect_err("no secret");
        assert!(err.contains("jwt secret"));
        assert!(validate_startup_config_contract(&valid()).is_ok());
    }

    #[test]
    fn startup_config_validation_enforces_hashing_floor() {
        let api = ApiConfig {
            pbkdf2_iterations: 10,
            ..valid()
        };
        let err = validate_startup_config_contract(&api).expect_err("weak iterations");
        assert!(err.contains("iterations"));
    }

    #[test]
    fn startup_config_validation_rejects_blank_admin_key() {
        let api = ApiConfig {
            admin_key: Some("  ".to_string()),
            ..valid()
        };
        let err = validate_startup_config_contract(&api).expect_err("blank admin key");
        assert!(err.contains("admin key"));
    }

    #[test]
    fn startup_config_validation_checks_timeout_and_page_bounds() {
        let api = ApiConfig {
            request_timeout_secs: 0,
            ..valid()
        };
        let err = validate_startup_config_contract(&api).expect_err("zero timeout");
        assert!(err.contains("timeout"));

        let api = ApiConfig {
            max_page_limit: 0,
            ..valid()
        };
        let err = validate_startup_config_contract(&api).expect_err("zero page limit");
        assert!(err.contains("page limits"));

        let api = ApiConfig {
            default_page_limit: 50,
            max_page_limit: 10,
            ..valid()
        };
        let err = validate_startup_config_contract(&api).expect_err("default over max");
        assert!(err.contains("default page limit"));
    }

    #[test]
    fn config_serialization_never_leaks_secrets() {
        let api = ApiConfig {
            admin_key: Some("adm".to_string()),
            ..valid()
        };
        let text = serde_json::to_string(&api).expect("serialize config");
        assert!(!text.contains("secret"));
        assert!(!text.contains("adm"));
    }
}
