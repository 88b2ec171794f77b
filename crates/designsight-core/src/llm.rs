//! Model-call boundary: role-tagged messages in, generated text out.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::security::SecretValue;
use crate::DesignSightError;

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Role tag for a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// One part of a message body; design payloads ride along as image URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: Vec<MessagePart>,
}

impl ChatMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: vec![MessagePart::Text { text: text.into() }],
        }
    }

    /// User message carrying a base64 PNG ahead of the prompt text.
    pub fn user_with_image(image_base64: &str, text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: vec![
                MessagePart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/png;base64,{image_base64}"),
                    },
                },
                MessagePart::Text { text: text.into() },
            ],
        }
    }
}

/// Parameters for one model call.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Boundary to the model provider. The agent contract issues exactly one
/// `complete` call per invocation.
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<String>;
}

pub type DynModelClient = Arc<dyn ModelClient>;

/// OpenRouter-compatible chat-completions client.
#[derive(Debug)]
pub struct OpenRouterClient {
    http: reqwest::Client,
    base_url: String,
    api_key: SecretValue,
}

impl OpenRouterClient {
    pub fn new(api_key: SecretValue) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Resolve the key named by the configuration; absence of the primary
    /// model credential is the one error that prevents a run from starting.
    pub fn from_config(config: &Config) -> Result<Self, DesignSightError> {
        let api_key = config.llm_api_key()?;
        Ok(Self::new(api_key))
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

#[async_trait]
impl ModelClient for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest) -> anyhow::Result<String> {
        tracing::debug!(model = %request.model, messages = request.messages.len(), "issuing chat completion");

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(self.api_key.expose())
            .json(&request)
            .send()
            .await
            .context("chat completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("model endpoint returned {status}: {body}"));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("malformed completion response")?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("completion contained no choices"))
    }
}

/// Scripted client for tests and offline runs.
///
/// Replies are popped in call order; once the queue is empty the fallback
/// text is returned, which score-extracts to the documented fallback value.
pub struct StaticModelClient {
    responses: Mutex<VecDeque<String>>,
    fallback: String,
}

impl StaticModelClient {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fallback: fallback.into(),
        }
    }

    pub fn with_responses(responses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            fallback: "Offline stub narrative; no live model was consulted.".to_string(),
        }
    }
}

impl Default for StaticModelClient {
    fn default() -> Self {
        Self::new("Offline stub narrative; no live model was consulted.")
    }
}

#[async_trait]
impl ModelClient for StaticModelClient {
    async fn complete(&self, _request: CompletionRequest) -> anyhow::Result<String> {
        let mut queue = self
            .responses
            .lock()
            .map_err(|_| anyhow!("scripted response queue poisoned"))?;
        Ok(queue.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }
}
