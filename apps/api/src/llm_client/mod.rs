/// LLM Client — the single point of entry for all text-generation calls.
///
/// ARCHITECTURAL RULE: No other module may call the model provider directly.
/// All LLM interactions MUST go through the `TextModel` trait implemented here.
///
/// One call per invocation. There is no retry and no backoff; a failed call is final
/// for that request and is surfaced to the caller.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::schema::{strict_json_schema, SCHEMA_NAME};
use crate::config::Config;

pub mod extract;
pub mod prompts;

use extract::extract_output_text;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Whether the remote call carries a machine-checkable schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaLevel {
    /// Prose instructions plus JSON mode; no schema attached.
    Unconstrained,
    /// Strict `json_schema` response format: all fields required, no extras.
    Constrained,
}

impl SchemaLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaLevel::Unconstrained => "unconstrained",
            SchemaLevel::Constrained => "constrained",
        }
    }
}

/// System instructions and user content for one model call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEnvelope {
    pub system_instructions: String,
    pub user_content: String,
}

/// The unparsed text the model produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawModelOutput {
    pub text: String,
}

/// The remote text-generation capability. `AppState` carries an `Arc<dyn TextModel>`
/// so tests can substitute a canned model without touching handlers.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn invoke(
        &self,
        envelope: &PromptEnvelope,
        level: SchemaLevel,
    ) -> Result<RawModelOutput, LlmError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseFormat {
    JsonObject,
    JsonSchema { json_schema: JsonSchemaSpec },
}

#[derive(Debug, Serialize)]
struct JsonSchemaSpec {
    name: &'static str,
    strict: bool,
    schema: Value,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// OpenAI-compatible chat completions client.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.http_timeout_secs))
                .build()?,
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Makes a single raw call to the chat completions endpoint and returns the reply JSON.
    pub async fn call(
        &self,
        envelope: &PromptEnvelope,
        level: SchemaLevel,
    ) -> Result<Value, LlmError> {
        let request_body = build_request(&self.model, envelope, level);

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl TextModel for LlmClient {
    async fn invoke(
        &self,
        envelope: &PromptEnvelope,
        level: SchemaLevel,
    ) -> Result<RawModelOutput, LlmError> {
        info!(model = %self.model, level = level.as_str(), "Invoking model");

        let reply = self.call(envelope, level).await?;

        if let Some(usage) = reply.get("usage") {
            let prompt_tokens = token_count(usage, "prompt_tokens");
            let completion_tokens = token_count(usage, "completion_tokens");
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                prompt_tokens, completion_tokens
            );
        }

        let text = extract_output_text(&reply).ok_or(LlmError::EmptyContent)?;
        Ok(RawModelOutput { text })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn token_count(usage: &Value, key: &str) -> u64 {
    usage.get(key).and_then(Value::as_u64).unwrap_or(0)
}

fn build_request<'a>(
    model: &'a str,
    envelope: &'a PromptEnvelope,
    level: SchemaLevel,
) -> ChatRequest<'a> {
    let response_format = match level {
        SchemaLevel::Unconstrained => ResponseFormat::JsonObject,
        SchemaLevel::Constrained => ResponseFormat::JsonSchema {
            json_schema: JsonSchemaSpec {
                name: SCHEMA_NAME,
                strict: true,
                schema: strict_json_schema(),
            },
        },
    };

    ChatRequest {
        model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &envelope.system_instructions,
            },
            ChatMessage {
                role: "user",
                content: &envelope.user_content,
            },
        ],
        response_format,
    }
}
