//! Session token authentication extractor.
//!
//! Validates the Bearer token in the Authorization header and exposes the
//! authenticated account to route handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::jwt;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;

/// Authenticated device account, resolved from the session token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// Account ID from the token subject claim.
    pub account_id: Uuid,
    /// Token ID (jti) for session tracking in logs.
    pub jti: String,
}

impl UserAuth {
    /// The member ID this account appears under in group member lists.
    pub fn member_id(&self) -> String {
        self.account_id.to_string()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let claims = state
            .jwt
            .validate_session_token(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        let account_id = jwt::extract_account_id(&claims)
            .map_err(|_| ApiError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(UserAuth {
            account_id,
            jti: claims.jti,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_is_account_uuid() {
        let id = Uuid::new_v4();
        let auth = UserAuth {
            account_id: id,
            jti: "test_jti".to_string(),
        };
        assert_eq!(auth.member_id(), id.to_string());
    }

    #[test]
    fn test_user_auth_clone() {
        let auth = UserAuth {
            account_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.account_id, cloned.account_id);
        assert_eq!(auth.jti, cloned.jti);
    }
}
