//! OpenAI-compatible chat-completions client.
//!
//! Every AI feature of the service goes through one single-turn exchange:
//! a system prompt, a user message, and optionally a JSON-constrained
//! response. The [`CompletionBackend`] trait is the seam the handlers talk
//! to, so tests can substitute a scripted backend for the real API.
//!
//! Failure classification matters here: transport errors and non-success
//! provider statuses become [`ApiError::Upstream`], while a reply that
//! arrives but is unusable becomes [`ApiError::MalformedOutput`].

use crate::libs::error::ApiError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env::var;

pub const DEFAULT_API_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const COMPLETIONS_URL: &str = "v1/chat/completions";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
}

impl OpenAiConfig {
    /// Reads provider settings from the environment. Returns `None` when
    /// no API key is set.
    pub fn from_env() -> Option<Self> {
        let api_key = var("OPENAI_API_KEY").ok().filter(|key| !key.trim().is_empty())?;
        Some(OpenAiConfig {
            api_key,
            api_url: var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            model: var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
        })
    }
}

/// One single-turn request to the model.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    /// Ask the provider to constrain the reply to a JSON object.
    pub json_response: bool,
}

#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Returns the model's reply content for a single-turn exchange.
    async fn complete(&self, request: CompletionRequest) -> Result<String, ApiError>;
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

pub struct OpenAi {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAi {
    pub fn new(config: &OpenAiConfig) -> Self {
        Self {
            client: Client::new(),
            config: config.clone(),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAi {
    async fn complete(&self, request: CompletionRequest) -> Result<String, ApiError> {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), COMPLETIONS_URL);
        let body = ChatCompletionBody {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: request.temperature,
            response_format: request
                .json_response
                .then_some(ResponseFormat { kind: "json_object" }),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| ApiError::upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ApiError::Upstream {
                status: Some(status.as_u16()),
                detail,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|err| ApiError::upstream(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ApiError::MalformedOutput("model returned no content".to_string()))
    }
}
