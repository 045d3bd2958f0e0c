//! Direct Anthropic Messages API backend.
//!
//! Sends the assembled prompt as a single user message and extracts the
//! text content blocks from the reply. Non-streaming, single attempt.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::{Backend, Response};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Environment variable holding the API key.
///
/// Consumed only by this backend; the other strategies never read it.
pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// Backend that calls the Anthropic Messages API directly.
#[derive(Debug)]
pub struct ApiBackend {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl ApiBackend {
    /// Creates a backend with an explicit API key.
    pub fn new(api_key: impl Into<String>, model: Option<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a backend from the `ANTHROPIC_API_KEY` environment variable.
    pub fn from_env(model: Option<String>) -> Result<Self> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config(format!("{API_KEY_VAR} is not set")))?;
        Ok(Self::new(api_key, model))
    }

    /// Overrides the base URL (testing, proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Extracts the concatenated text blocks from a parsed reply.
    fn extract_text(parsed: &MessagesResponse) -> Result<String> {
        let text: Vec<&str> = parsed
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect();

        if text.is_empty() {
            return Err(Error::ResponseShape(
                "API response contains no text content".into(),
            ));
        }

        Ok(text.join("\n"))
    }
}

#[async_trait]
impl Backend for ApiBackend {
    async fn invoke(&self, prompt: &str) -> Result<Response> {
        let url = format!("{}/v1/messages", self.base_url);
        let body = MessagesRequest {
            model: &self.model,
            max_tokens: DEFAULT_MAX_TOKENS,
            messages: vec![ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        tracing::debug!(model = %self.model, "sending Messages API request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !status.is_success() {
            // Prefer the structured error message when the body carries one.
            let message = serde_json::from_str::<ApiErrorBody>(&raw)
                .map(|body| body.error.message)
                .unwrap_or_else(|_| raw.trim().to_string());
            return Err(Error::Backend(format!(
                "API returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        let parsed: MessagesResponse = serde_json::from_str(&raw)
            .map_err(|e| Error::ResponseShape(format!("cannot parse API response: {e}")))?;

        Ok(Response {
            text: Self::extract_text(&parsed)?,
        })
    }

    fn name(&self) -> &str {
        "api"
    }
}

// --- Messages API wire types ---

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    /// Tool use, thinking, and future block types carry no plain text.
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
