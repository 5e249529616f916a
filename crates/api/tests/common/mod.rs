//! Common test utilities for integration tests.
//!
//! Tests run against the in-memory store adapters and a mock push service,
//! so no database or network is needed.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use classbell_api::app::{create_app, AppDeps};
use classbell_api::config::{
    AuthConfig, Config, DatabaseConfig, LimitsConfig, LoggingConfig, PushConfig, SecurityConfig,
    ServerConfig,
};
use domain::services::MockPushService;
use domain::store::memory::{InMemoryAccountStore, InMemoryGroupStore};
use tower::ServiceExt;

/// An application wired for tests, with handles on its fakes.
pub struct TestApp {
    pub app: Router,
    pub groups: Arc<InMemoryGroupStore>,
    pub push: Arc<MockPushService>,
}

/// Default test configuration.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout_secs: 30,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
        },
        limits: LimitsConfig {
            max_members: 20,
            cooldown_secs: 60,
        },
        auth: AuthConfig {
            session_secret: "test-session-secret".to_string(),
            device_secret: "test-device-secret".to_string(),
            session_ttl_secs: 3600,
            leeway_secs: 30,
        },
        push: PushConfig {
            enabled: false,
            url: String::new(),
            api_key: String::new(),
            timeout_ms: 10_000,
            max_retries: 3,
        },
    }
}

/// Builds an app on fresh in-memory stores.
pub fn spawn_app(config: Config) -> TestApp {
    spawn_app_with_push(config, MockPushService::new())
}

/// Builds an app whose push service can be set up to fail.
pub fn spawn_app_with_push(config: Config, push: MockPushService) -> TestApp {
    let groups = Arc::new(InMemoryGroupStore::new());
    let push = Arc::new(push);

    let deps = AppDeps {
        groups: groups.clone(),
        accounts: Arc::new(InMemoryAccountStore::new()),
        push: push.clone(),
        pool: None,
    };

    TestApp {
        app: create_app(config, deps),
        groups,
        push,
    }
}

/// Authenticated test session.
pub struct TestSession {
    pub account_id: String,
    pub token: String,
}

/// Registers (or logs in) a device and returns its session.
pub async fn authenticate(app: &Router, device_id: &str) -> TestSession {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/device")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::json!({ "deviceId": device_id }).to_string(),
        ))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = parse_response_body(response).await;
    assert!(
        status.is_success(),
        "Authentication failed with status {}: {}",
        status,
        body
    );

    TestSession {
        account_id: body["accountId"].as_str().unwrap().to_string(),
        token: body["sessionToken"].as_str().unwrap().to_string(),
    }
}

/// Build a JSON request with a session token.
pub fn json_request_with_auth(
    method: Method,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a bodyless request with a session token.
pub fn empty_request_with_auth(method: Method, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Build an unauthenticated JSON request.
pub fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper to parse a JSON response body.
pub async fn parse_response_body(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
}

/// Creates a group through the API and returns its code.
pub async fn create_group(app: &Router, session: &TestSession, code: &str) {
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/groups",
            serde_json::json!({ "code": code }),
            &session.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
}

/// Joins a group through the API.
pub async fn join_group(app: &Router, session: &TestSession, code: &str) {
    let response = app
        .clone()
        .oneshot(empty_request_with_auth(
            Method::POST,
            &format!("/api/v1/groups/{}/join", code),
            &session.token,
        ))
        .await
        .unwrap();
    assert!(response.status().is_success());
}
