//! Remote explanation providers.
//!
//! All supported backends speak the OpenAI-compatible chat completions
//! protocol and differ only in endpoint, credential variable and default
//! model, so a single [`chat::ChatProvider`] serves them all.

pub mod chat;

use async_trait::async_trait;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use chat::ChatProvider;

/// Hosted backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Groq (OpenAI-compatible endpoint)
    #[default]
    Groq,
    /// OpenAI API
    #[value(name = "openai")]
    OpenAI,
    /// OpenRouter API (access to multiple models)
    #[value(name = "openrouter")]
    OpenRouter,
}

impl ProviderKind {
    /// Display name used in messages
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Groq => "Groq",
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::OpenRouter => "OpenRouter",
        }
    }

    /// Base URL of the chat completions API
    pub fn default_base_url(self) -> &'static str {
        match self {
            ProviderKind::Groq => "https://api.groq.com/openai/v1",
            ProviderKind::OpenAI => "https://api.openai.com/v1",
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
        }
    }

    pub fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Groq => "deepseek-r1-distill-llama-70b",
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::OpenRouter => "deepseek/deepseek-r1",
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Groq => write!(f, "groq"),
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::OpenRouter => write!(f, "openrouter"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "groq" => Ok(ProviderKind::Groq),
            "openai" => Ok(ProviderKind::OpenAI),
            "openrouter" => Ok(ProviderKind::OpenRouter),
            _ => Err(format!(
                "Unknown provider: {}. Valid options: groq, openai, openrouter",
                s
            )),
        }
    }
}

/// A successful answer from a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    /// Raw response text, before any post-processing
    pub raw_response: String,
    /// Model that generated the response
    pub model: String,
}

/// Error types for provider operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    #[error("API key not configured for {provider}. Set {env_var} environment variable.")]
    MissingApiKey { provider: String, env_var: String },

    #[error("Rate limited by {provider}. Please wait and try again.")]
    RateLimited { provider: String },

    #[error("API error from {provider}: {message}")]
    ApiError { provider: String, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response from {provider}: {message}")]
    InvalidResponse { provider: String, message: String },
}

/// Answers a prompt given recent terminal output as context.
#[async_trait]
pub trait Explainer: Send + Sync {
    /// Provider name for display
    fn name(&self) -> &str;

    /// Environment variable that supplies the credential
    fn api_key_env_var(&self) -> &str;

    /// Whether a credential is present
    fn is_available(&self) -> bool;

    async fn explain(&self, prompt: &str, context: &str) -> Result<Explanation, ProviderError>;
}

/// Read the API key for a provider, treating an empty value as unset.
pub fn get_api_key(kind: ProviderKind) -> Option<String> {
    std::env::var(kind.api_key_env_var())
        .ok()
        .filter(|s| !s.trim().is_empty())
}
