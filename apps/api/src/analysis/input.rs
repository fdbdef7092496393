//! Input Normalizer — turns pasted text or a URL into a single `AnalysisRequest`.
//!
//! URL ingestion is a single GET (redirects followed, no retries). The body is
//! passed through as-is and only truncated by length; the model is asked to pick
//! the advertisement out of any surrounding markup.

use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::errors::AppError;

/// Upper bound on forwarded page content, in characters.
pub const MAX_FETCHED_CHARS: usize = 50_000;

pub const DIRECT_TEXT_LABEL: &str = "Job advertisement (pasted text)";

const USER_AGENT: &str = concat!("adreview-api/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    DirectText,
    FetchedUrl,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::DirectText => "direct_text",
            SourceKind::FetchedUrl => "fetched_url",
        }
    }
}

/// Normalized input for one analysis. `content` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub content: String,
    pub source_label: String,
    pub source_kind: SourceKind,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("job text is empty")]
    EmptyText,

    #[error("not a full http(s) URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Network(reqwest::Error),

    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("body could not be read as text: {0}")]
    Read(reqwest::Error),

    #[error("page body is empty")]
    EmptyBody,
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::EmptyText => {
                AppError::InvalidInput("jobText is missing or invalid.".to_string())
            }
            IngestError::InvalidUrl(_) => AppError::InvalidInput(
                "Please provide a full URL starting with http:// or https://.".to_string(),
            ),
            IngestError::Network(e) => AppError::FetchFailed {
                status: None,
                detail: e.to_string(),
            },
            IngestError::UpstreamStatus { status, reason } => AppError::FetchFailed {
                status: Some(status),
                detail: reason,
            },
            IngestError::Read(e) => AppError::ReadFailed(e.to_string()),
            IngestError::EmptyBody => AppError::ReadFailed("empty body".to_string()),
        }
    }
}

impl AnalysisRequest {
    /// Builds a request from pasted text. Whitespace-only input is rejected.
    pub fn from_text(raw: &str) -> Result<Self, IngestError> {
        let content = raw.trim();
        if content.is_empty() {
            return Err(IngestError::EmptyText);
        }
        Ok(Self {
            content: content.to_string(),
            source_label: DIRECT_TEXT_LABEL.to_string(),
            source_kind: SourceKind::DirectText,
        })
    }
}

/// Case-insensitive `^https?://` check.
pub fn is_http_url(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Keeps at most `max` characters (not bytes) of `text`.
pub fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((byte_idx, _)) = text.char_indices().nth(max) {
        text.truncate(byte_idx);
    }
    text
}

/// Fetches advertisement pages over HTTP.
#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()?,
        })
    }

    /// Validates `url`, performs one GET and returns the truncated body.
    /// Invalid URLs, including ones with surrounding whitespace, are rejected
    /// before any network activity.
    pub async fn from_url(&self, url: &str) -> Result<AnalysisRequest, IngestError> {
        if !is_http_url(url) {
            return Err(IngestError::InvalidUrl(url.to_string()));
        }

        info!("Fetching job ad from {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(IngestError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::UpstreamStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(IngestError::Read)?;
        if body.trim().is_empty() {
            return Err(IngestError::EmptyBody);
        }

        let original_chars = body.chars().count();
        let content = truncate_chars(body, MAX_FETCHED_CHARS);
        if original_chars > MAX_FETCHED_CHARS {
            debug!("Truncated page from {original_chars} to {MAX_FETCHED_CHARS} chars");
        }

        Ok(AnalysisRequest {
            content,
            source_label: format!("Web page at {url}"),
            source_kind: SourceKind::FetchedUrl,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{http::StatusCode, routing::get, Router};
    use tokio::net::TcpListener;

    pub const AD_PAGE: &str =
        "<html><body><h1>Backend Developer (m/w/d)</h1><p>Rust, Postgres, 30 days off.</p></body></html>";

    /// Serves a few canned pages on an ephemeral local port and returns the base URL.
    pub async fn spawn_page_server() -> String {
        let app = Router::new()
            .route("/ad", get(|| async { AD_PAGE }))
            .route("/big", get(|| async { "x".repeat(60_000) }))
            .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "gone") }))
            .route("/empty", get(|| async { "" }));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}
