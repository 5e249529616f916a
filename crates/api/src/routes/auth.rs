//! Device authentication endpoint.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;

/// Register-or-login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAuthRequest {
    /// Stable installation identifier chosen by the client.
    #[validate(length(min = 1, max = 128, message = "deviceId must be 1-128 characters"))]
    pub device_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceAuthResponse {
    pub account_id: Uuid,
    pub device_id: String,
    pub session_token: String,
}

/// `POST /api/v1/auth/device`
///
/// Registers the device on first call, logs it in on every later call.
/// Both paths return a fresh session token for the same account.
pub async fn register_device(
    State(state): State<AppState>,
    Json(req): Json<DeviceAuthRequest>,
) -> Result<Json<DeviceAuthResponse>, ApiError> {
    req.validate()?;

    let account = state.identity.register_or_login(&req.device_id).await?;

    let (session_token, jti) = state
        .jwt
        .generate_session_token(account.id)
        .map_err(|e| ApiError::Internal(format!("failed to issue session token: {}", e)))?;

    tracing::info!(account_id = %account.id, jti = %jti, "Device session issued");

    Ok(Json(DeviceAuthResponse {
        account_id: account.id,
        device_id: account.device_id,
        session_token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_rejects_empty_device_id() {
        let req = DeviceAuthRequest {
            device_id: String::new(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_rejects_oversized_device_id() {
        let req = DeviceAuthRequest {
            device_id: "x".repeat(129),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_request_accepts_typical_device_id() {
        let req = DeviceAuthRequest {
            device_id: "ios-6ba7b810-9dad-11d1-80b4-00c04fd430c8".to_string(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let response = DeviceAuthResponse {
            account_id: Uuid::nil(),
            device_id: "dev".to_string(),
            session_token: "tok".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("accountId").is_some());
        assert!(json.get("sessionToken").is_some());
    }
}
