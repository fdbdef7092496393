use anyhow::{bail, Context, Result};

use crate::llm_client::SchemaLevel;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
/// Tokens live at most one year.
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub model: String,
    pub schema_level: SchemaLevel,
    /// Token issuer settings. The issuer counts as unconfigured unless all three are set.
    pub jwt_secret: Option<String>,
    pub auth_username: Option<String>,
    pub auth_password: Option<String>,
    pub token_ttl_hours: i64,
    /// Transport timeout for outbound HTTP (page fetches and model calls).
    pub http_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            openai_base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            schema_level: parse_schema_level(
                &std::env::var("SCHEMA_MODE").unwrap_or_else(|_| "strict".to_string()),
            )?,
            jwt_secret: optional_env("JWT_SECRET"),
            auth_username: optional_env("AUTH_USERNAME"),
            auth_password: optional_env("AUTH_PASSWORD"),
            token_ttl_hours: parse_ttl_hours(
                &std::env::var("TOKEN_TTL_HOURS").unwrap_or_else(|_| "12".to_string()),
            )?,
            http_timeout_secs: std::env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// True when username, password and signing secret are all present.
    pub fn issuer_configured(&self) -> bool {
        self.jwt_secret.is_some() && self.auth_username.is_some() && self.auth_password.is_some()
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Empty values count as unset so a blank line in `.env` does not configure anything.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_schema_level(raw: &str) -> Result<SchemaLevel> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" | "constrained" => Ok(SchemaLevel::Constrained),
        "json" | "unconstrained" => Ok(SchemaLevel::Unconstrained),
        other => bail!("SCHEMA_MODE must be 'strict' or 'json', got '{other}'"),
    }
}

fn parse_ttl_hours(raw: &str) -> Result<i64> {
    let hours = raw
        .trim()
        .parse::<i64>()
        .context("TOKEN_TTL_HOURS must be a whole number of hours")?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        bail!("TOKEN_TTL_HOURS must be between 1 and {MAX_TOKEN_TTL_HOURS}, got {hours}");
    }
    Ok(hours)
}
