#![allow(dead_code)]

use rcguard_server::{build_router, ApiConfig, AppState};
use rcguard_store::DocumentStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const ADMIN_KEY: &str = "test-admin-key";

pub fn test_config() -> ApiConfig {
    ApiConfig {
        jwt_secret: "test-secret".to_string(),
        admin_key: Some(ADMIN_KEY.to_string()),
        // keep test signups fast
        pbkdf2_iterations: 1_000,
        ..ApiConfig::default()
    }
}

pub async fn spawn_server(api: ApiConfig) -> SocketAddr {
    let store = DocumentStore::open_in_memory().expect("open store");
    let app = build_router(AppState::new(Arc::new(store), api));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

pub async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    if let Some(body) = body {
        req.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n",
            body.len()
        ));
    }
    req.push_str("\r\n");
    if let Some(body) = body {
        req.push_str(body);
    }
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

pub async fn get(addr: SocketAddr, path: &str) -> (u16, String, String) {
    send_raw(addr, "GET", path, &[], None).await
}

pub async fn post_json(
    addr: SocketAddr,
    path: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (u16, String, String) {
    send_raw(addr, "POST", path, headers, Some(body)).await
}

/// Registers an account and returns its bearer token.
pub async fn signup(addr: SocketAddr, email: &str) -> String {
    let body = format!(r#"{{"email":"{email}","password":"hunter22","fullName":"Test User"}}"#);
    let (status, _, response) = post_json(addr, "/api/auth/signup", &[], &body).await;
    assert_eq!(status, 201, "signup failed: {response}");
    let json: serde_json::Value = serde_json::from_str(&response).expect("signup json");
    json["token"].as_str().expect("signup token").to_string()
}

/// Registers a vehicle through the admin route and returns its id.
pub async fn register_vehicle(addr: SocketAddr, body: &str) -> String {
    let (status, _, response) =
        post_json(addr, "/api/rc", &[("x-admin-key", ADMIN_KEY)], body).await;
    assert_eq!(status, 201, "vehicle create failed: {response}");
    let json: serde_json::Value = serde_json::from_str(&response).expect("vehicle json");
    json["id"].as_str().expect("vehicle id").to_string()
}
