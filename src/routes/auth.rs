use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{jwt, password};
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct Login {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<SharedState>,
    Json(req): Json<Login>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = req.email.trim().to_lowercase();

    if let Err(retry_after) = state.login_limiter.check(&email) {
        return Err(AppError::RateLimited(format!(
            "Too many login attempts, retry in {retry_after}s"
        )));
    }

    let identity = db::identities::find_by_email(&state.pool, &email).await?;

    // Same error for unknown email and bad password
    let Some(identity) = identity else {
        state.login_limiter.record_failure(&email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let valid = password::verify(&req.password, &identity.password_hash)
        .map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(&email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let profile = db::profiles::find_by_id(&state.pool, identity.id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let claims = jwt::Claims::new(profile.id, profile.email.clone());
    let access_token = jwt::encode_token(&claims, &state.config.jwt_secret)
        .map_err(AppError::Internal)?;

    Ok(Json(json!({
        "access_token": access_token,
        "profile": profile,
    })))
}
