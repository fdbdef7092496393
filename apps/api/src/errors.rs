use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Hint appended to every URL ingestion failure.
const PASTE_TEXT_HINT: &str = "Please paste the job ad text directly instead.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every response body is `{ "error": "<message>" }`; diagnostic detail is only logged.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Token issuer is not configured")]
    AuthNotConfigured,

    /// Network/TLS failure (`status == None`) or non-2xx upstream response.
    #[error("Fetch failed (status {status:?}): {detail}")]
    FetchFailed { status: Option<u16>, detail: String },

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Unparsable model output")]
    UnparsableOutput { raw: String },

    #[error("Remote capability error: {0}")]
    RemoteCapability(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AuthNotConfigured
            | AppError::FetchFailed { .. }
            | AppError::ReadFailed(_)
            | AppError::UnparsableOutput { .. }
            | AppError::RemoteCapability(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-facing message. Never includes upstream bodies or raw model text.
    pub fn public_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::Unauthenticated(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid username or password.".to_string(),
            AppError::AuthNotConfigured => {
                "Authentication is not configured on this server.".to_string()
            }
            AppError::FetchFailed {
                status: Some(code), ..
            } => format!("The page could not be loaded (HTTP status {code}). {PASTE_TEXT_HINT}"),
            AppError::FetchFailed { status: None, .. } => {
                format!("The URL could not be reached. {PASTE_TEXT_HINT}")
            }
            AppError::ReadFailed(_) => {
                format!("The page content could not be read. {PASTE_TEXT_HINT}")
            }
            AppError::UnparsableOutput { .. } => {
                "The AI response could not be read as JSON.".to_string()
            }
            AppError::RemoteCapability(_) => {
                "The AI analysis service failed to respond.".to_string()
            }
            AppError::Internal(_) => "An internal server error occurred.".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::InvalidInput(msg) => tracing::debug!("Rejected input: {msg}"),
            AppError::Unauthenticated(msg) => tracing::debug!("Rejected credential: {msg}"),
            AppError::InvalidCredentials => tracing::warn!("Login attempt with wrong credentials"),
            AppError::AuthNotConfigured => {
                tracing::error!("JWT_SECRET / AUTH_USERNAME / AUTH_PASSWORD not configured")
            }
            AppError::FetchFailed { status, detail } => {
                tracing::error!("URL fetch failed (status {status:?}): {detail}")
            }
            AppError::ReadFailed(detail) => tracing::error!("URL body read failed: {detail}"),
            AppError::UnparsableOutput { raw } => {
                tracing::error!("Model output is not JSON: {raw}")
            }
            AppError::RemoteCapability(msg) => tracing::error!("LLM error: {msg}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        let body = Json(json!({ "error": self.public_message() }));
        (self.status(), body).into_response()
    }
}
