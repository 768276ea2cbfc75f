#![forbid(unsafe_code)]

use rcguard_server::{
    build_router, validate_startup_config_contract, ApiConfig, AppState, CRATE_NAME,
};
use rcguard_store::DocumentStore;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_str(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(default)
}

/// `NAME` directly, or `NAME_FILE` pointing at a mounted secret file.
fn env_secret(name: &str) -> Option<String> {
    if let Ok(value) = env::var(name) {
        if !value.trim().is_empty() {
            return Some(value);
        }
    }
    let file_var = format!("{name}_FILE");
    let path = env::var(file_var).ok()?;
    match std::fs::read_to_string(&path) {
        Ok(contents) => {
            let trimmed = contents.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Err(err) => {
            error!(error = %err, path, "secret file unreadable");
            None
        }
    }
}

fn env_list(name: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = ApiConfig {
        bind_addr: env_str("RCGUARD_BIND", "0.0.0.0:8080"),
        max_body_bytes: env_usize("RCGUARD_MAX_BODY_BYTES", 64 * 1024),
        request_timeout_secs: env_u64("RCGUARD_REQUEST_TIMEOUT_SECS", 30),
        jwt_secret: env_secret("RCGUARD_JWT_SECRET").unwrap_or_default(),
        jwt_ttl_secs: env_u64("RCGUARD_JWT_TTL_SECS", 86_400),
        admin_key: env_secret("RCGUARD_ADMIN_KEY"),
        pbkdf2_iterations: env_u64("RCGUARD_PBKDF2_ITERATIONS", 100_000) as u32,
        min_password_len: env_usize("RCGUARD_MIN_PASSWORD_LEN", 6),
        cors_allowed_origins: env_list("RCGUARD_CORS_ORIGINS"),
        enable_audit_log: env_bool("RCGUARD_AUDIT_LOG", true),
        default_page_limit: env_u32("RCGUARD_PAGE_LIMIT", rcguard_api::DEFAULT_PAGE_LIMIT),
        max_page_limit: env_u32("RCGUARD_MAX_PAGE_LIMIT", rcguard_api::MAX_PAGE_LIMIT),
    };
    if let Err(err) = validate_startup_config_contract(&api) {
        error!(error = %err, "invalid startup configuration");
        std::process::exit(2);
    }
    if api.admin_key.is_none() {
        info!("no admin key configured; registry write routes are disabled");
    }

    let db_path = PathBuf::from(env_str("RCGUARD_DB_PATH", "rcguard.sqlite"));
    let store = match DocumentStore::open(&db_path) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, path = %db_path.display(), "store open failed");
            std::process::exit(2);
        }
    };

    let state = AppState::new(Arc::new(store), api);
    let bind = state.api.bind_addr.clone();
    let app = build_router(state);

    let listener = match TcpListener::bind(&bind).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, addr = %bind, "bind failed");
            std::process::exit(2);
        }
    };
    info!(service = CRATE_NAME, addr = %bind, "listening");

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown signal received");
    };
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!(error = %err, "server exited with error");
        std::process::exit(1);
    }
}
