use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::auth::jwt;
use crate::error::AppError;
use crate::state::SharedState;

/// A dashboard caller authenticated by a profile JWT.
#[derive(Debug, Clone)]
pub struct AuthProfile {
    pub profile_id: Uuid,
    pub email: String,
}

impl FromRequestParts<SharedState> for AuthProfile {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = jwt::decode_token(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(AuthProfile {
            profile_id: claims.sub,
            email: claims.email,
        })
    }
}

/// Marker extractor for the function endpoints: the caller must present the
/// trusted service-role key as a Bearer token.
#[derive(Debug, Clone, Copy)]
pub struct ServiceKey;

impl FromRequestParts<SharedState> for ServiceKey {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        if token == state.config.service_key {
            Ok(ServiceKey)
        } else {
            Err(AppError::Unauthorized("Invalid service key".to_string()))
        }
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get("authorization")
        .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("Missing authentication token".to_string()))
}
