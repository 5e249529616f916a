//! Integration tests for device registration and session issuance.

mod common;

use axum::http::{Method, StatusCode};
use common::*;
use tower::ServiceExt;

#[tokio::test]
async fn test_register_returns_account_and_token() {
    let test = spawn_app(test_config());

    let response = test
        .app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/device",
            serde_json::json!({ "deviceId": "ios-device-1" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert!(body["accountId"].as_str().is_some());
    assert_eq!(body["deviceId"], "ios-device-1");
    assert!(!body["sessionToken"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_register_twice_returns_same_account() {
    let test = spawn_app(test_config());

    let first = authenticate(&test.app, "ios-device-1").await;
    let second = authenticate(&test.app, "ios-device-1").await;

    assert_eq!(first.account_id, second.account_id);
    // Each login issues a fresh token for the same account.
    assert_ne!(first.token, second.token);
}

#[tokio::test]
async fn test_distinct_devices_get_distinct_accounts() {
    let test = spawn_app(test_config());

    let first = authenticate(&test.app, "ios-device-1").await;
    let second = authenticate(&test.app, "android-device-2").await;

    assert_ne!(first.account_id, second.account_id);
}

#[tokio::test]
async fn test_register_rejects_empty_device_id() {
    let test = spawn_app(test_config());

    let response = test
        .app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/auth/device",
            serde_json::json!({ "deviceId": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_route_without_token_is_unauthorized() {
    let test = spawn_app(test_config());

    let response = test
        .app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/groups",
            serde_json::json!({ "code": "AB12CD" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_garbage_token_is_unauthorized() {
    let test = spawn_app(test_config());

    let response = test
        .app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/groups",
            serde_json::json!({ "code": "AB12CD" }),
            "not-a-jwt",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_token_works_on_protected_route() {
    let test = spawn_app(test_config());
    let session = authenticate(&test.app, "ios-device-1").await;

    let response = test
        .app
        .clone()
        .oneshot(json_request_with_auth(
            Method::POST,
            "/api/v1/groups",
            serde_json::json!({ "code": "AB12CD" }),
            &session.token,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_health_probes_are_public() {
    let test = spawn_app(test_config());

    for uri in ["/api/health", "/api/health/live", "/api/health/ready"] {
        let request = axum::http::Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(axum::body::Body::empty())
            .unwrap();
        let response = test.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "probe {} failed", uri);
    }
}
