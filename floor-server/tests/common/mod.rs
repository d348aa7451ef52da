//! Shared helpers for API integration tests
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use base64::Engine;
use floor_server::store::MemoryStore;
use floor_server::utils::time::{Clock, parse_instant};
use floor_server::{AppState, Config, api};
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

/// A JWT-shaped key whose payload carries `role`
pub fn key_with_role(role: &str) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(format!(r#"{{"role":"{role}"}}"#));
    format!("{header}.{payload}.sig")
}

pub fn config_with(extra: &[(&str, &str)]) -> Config {
    let key = key_with_role("service_role");
    Config::from_lookup(|name| match name {
        "SUPABASE_URL" => Some("http://store.test".into()),
        "SUPABASE_SERVICE_KEY" => Some(key.clone()),
        _ => extra
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.to_string()),
    })
    .expect("test config")
}

pub fn app(store: Arc<MemoryStore>) -> Router {
    api::build_app(AppState::new(config_with(&[]), store))
}

/// App whose clock is frozen at `at` (YYYY-MM-DDTHH:MM)
pub fn app_at(store: Arc<MemoryStore>, at: &str) -> Router {
    let now = parse_instant(at).expect("test instant");
    let state = AppState::new(config_with(&[]), store).with_clock(Clock::Fixed(now));
    api::build_app(state)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: Router, request: Request<Body>) -> TestResponse {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn get(app: Router, uri: &str) -> TestResponse {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request");
    send(app, request).await
}

/// `Value::Null` sends an empty body
pub async fn send_json(app: Router, method: Method, uri: &str, body: Value) -> TestResponse {
    let body = match body {
        Value::Null => Body::empty(),
        body => Body::from(body.to_string()),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body)
        .expect("request");
    send(app, request).await
}

/// Demo store plus one reservation per JSON value
pub fn demo_with(reservations: Vec<Value>) -> Arc<MemoryStore> {
    let store = MemoryStore::demo();
    store.seed(floor_server::store::RESERVATIONS, reservations);
    Arc::new(store)
}
