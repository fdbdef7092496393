//! Axum route handlers for the analysis API.
//!
//! `AuthUser` comes first in every signature so the credential is checked before
//! the body is touched. Body problems surface as 400 `{ error }`, never as
//! axum's default rejection.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::analysis::input::AnalysisRequest;
use crate::analysis::pipeline::analyze;
use crate::analysis::schema::AnalysisResult;
use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::state::AppState;

// Fields are kept as raw JSON so a wrong type yields our own 400 message.

#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    #[serde(rename = "jobText", default)]
    pub job_text: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeUrlRequest {
    #[serde(default)]
    pub url: Option<Value>,
}

/// POST /api/analyze-job-ad
pub async fn handle_analyze_text(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    body: Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(body) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let job_text = body
        .job_text
        .as_ref()
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::InvalidInput("jobText is missing or invalid.".to_string()))?;

    info!(user = %identity.subject, "Text analysis requested");

    let request = AnalysisRequest::from_text(job_text)?;
    let result = analyze(&request, state.model.as_ref(), state.config.schema_level).await?;
    Ok(Json(result))
}

/// POST /api/analyze-job-url
pub async fn handle_analyze_url(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    body: Result<Json<AnalyzeUrlRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, AppError> {
    let Json(body) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;
    let url = body
        .url
        .as_ref()
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::InvalidInput("url is missing or invalid.".to_string()))?;

    info!(user = %identity.subject, "URL analysis requested");

    let request = state.fetcher.from_url(url).await?;
    let result = analyze(&request, state.model.as_ref(), state.config.schema_level).await?;
    Ok(Json(result))
}
