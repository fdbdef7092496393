use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

/// POST /api/login
///
/// Exchanges the configured username/password for a signed access token.
pub async fn handle_login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let (Some(tokens), Some(username), Some(password)) = (
        state.tokens.as_ref(),
        state.config.auth_username.as_deref(),
        state.config.auth_password.as_deref(),
    ) else {
        return Err(AppError::AuthNotConfigured);
    };

    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    if request.username != username || request.password != password {
        return Err(AppError::InvalidCredentials);
    }

    let token = tokens
        .create_token(&request.username)
        .map_err(|e| AppError::Internal(e.into()))?;

    info!("Issued token for {}", request.username);

    Ok(Json(LoginResponse {
        token,
        expires_in: tokens.ttl_seconds(),
    }))
}
