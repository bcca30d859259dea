//! OpenAI-compatible chat completions provider.
//!
//! Used for Groq, OpenAI and OpenRouter. Requests are sent in a single
//! non-streaming round trip.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::{Explainer, Explanation, ProviderError, ProviderKind};
use crate::config::ProviderConfig;

/// System prompt for the terminal copilot persona
const SYSTEM_PROMPT: &str = "You are a fun, witty, and highly intelligent terminal copilot. \
You help debug errors, explain commands, and provide actionable, creative, and concise solutions. \
You can also chat like a general assistant. Be friendly and engaging!";

/// Chat completions client for one configured backend
pub struct ChatProvider {
    client: Client,
    kind: ProviderKind,
    /// API key, `None` when the environment variable is unset
    api_key: Option<String>,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f32,
}

impl ChatProvider {
    /// Create a provider from config and an explicit API key.
    pub fn new(config: &ProviderConfig, api_key: Option<String>) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            kind: config.kind,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: config.model().to_string(),
            endpoint: format!("{}/chat/completions", config.base_url().trim_end_matches('/')),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Create a provider, reading the API key from the environment
    pub fn from_env(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Self::new(config, super::get_api_key(config.kind))
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request body
    fn build_request(&self, prompt: &str, context: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: format_input(prompt, context),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn missing_key(&self) -> ProviderError {
        ProviderError::MissingApiKey {
            provider: self.kind.display_name().to_string(),
            env_var: self.kind.api_key_env_var().to_string(),
        }
    }
}

/// User message: the prompt followed by the recent terminal output
fn format_input(prompt: &str, context: &str) -> String {
    format!("{prompt}\n\nRecent terminal output:\n{context}")
}

#[async_trait]
impl Explainer for ChatProvider {
    fn name(&self) -> &str {
        self.kind.display_name()
    }

    fn api_key_env_var(&self) -> &str {
        self.kind.api_key_env_var()
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn explain(&self, prompt: &str, context: &str) -> Result<Explanation, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(self.missing_key());
        };
        let provider = self.kind.display_name().to_string();
        let request = self.build_request(prompt, context);

        debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            context_lines = context.lines().count(),
            "sending chat completion request"
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request);
        if self.kind == ProviderKind::OpenRouter {
            builder = builder.header("X-Title", "termpilot");
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            debug!(%status, body = %error_body, "provider returned error status");
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited { provider });
            }
            return Err(ProviderError::ApiError {
                provider,
                message: format!("HTTP {}: {}", status, error_body),
            });
        }

        let response_body: ChatCompletionResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::InvalidResponse {
                    provider: provider.clone(),
                    message: e.to_string(),
                })?;

        let content = response_body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .map(|m| m.content)
            .ok_or_else(|| ProviderError::InvalidResponse {
                provider,
                message: "response contained no choices".to_string(),
            })?;

        Ok(Explanation {
            raw_response: content,
            model: self.model.clone(),
        })
    }
}

// API types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChatMessage>,
}
