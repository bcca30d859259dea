//! Configuration system for `termpilot`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::buffer;
use crate::providers::ProviderKind;

/// Remote provider settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Backend to talk to
    pub kind: ProviderKind,
    /// Model override (provider default if unset)
    pub model: Option<String>,
    /// Base URL override, without the `/chat/completions` suffix
    pub base_url: Option<String>,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            model: None,
            base_url: None,
            max_tokens: 600,
            temperature: 0.5,
            timeout_secs: 60,
        }
    }
}

impl ProviderConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.kind.default_model())
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_base_url())
    }
}

/// Interactive session settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Lines of command output kept in the rolling buffer
    pub buffer_lines: usize,
    /// Lines of buffered output sent as context with each request
    pub context_lines: usize,
    /// Explain detected errors without asking first
    pub auto_explain: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            buffer_lines: buffer::DEFAULT_CAPACITY,
            context_lines: 20,
            auto_explain: false,
        }
    }
}

/// Input classifier settings
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Extra command names treated as shell commands
    pub extra_commands: Vec<String>,
}

/// Root configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub session: SessionConfig,
    pub classifier: ClassifierConfig,
}

impl Config {
    /// Load config from `path`, or the default location when `None`.
    /// A missing file yields the default config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => match Self::config_path() {
                Some(path) => Self::load_from_path(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the config file path (~/.config/termpilot/config.toml)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("termpilot").join("config.toml"))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        // TERMPILOT_PROVIDER=openai selects the backend
        if let Some(value) = lookup("TERMPILOT_PROVIDER") {
            match value.parse::<ProviderKind>() {
                Ok(kind) => self.provider.kind = kind,
                Err(e) => warn!("ignoring TERMPILOT_PROVIDER: {e}"),
            }
        }

        if let Some(model) = lookup("TERMPILOT_MODEL").filter(|m| !m.trim().is_empty()) {
            self.provider.model = Some(model.trim().to_string());
        }

        // TERMPILOT_AUTO_EXPLAIN=1 enables auto-explain
        if lookup("TERMPILOT_AUTO_EXPLAIN").is_some_and(|v| v == "1") {
            self.session.auto_explain = true;
        }
    }
}

/// Generate default config as TOML string
pub fn generate_default_config() -> String {
    r#"# termpilot configuration
# Place this file at ~/.config/termpilot/config.toml

[provider]
# Backend: "groq", "openai" or "openrouter"
kind = "groq"

# Model override (defaults to the provider's default model)
# model = "deepseek-r1-distill-llama-70b"

# Base URL override, without the /chat/completions suffix
# base_url = "https://api.groq.com/openai/v1"

max_tokens = 600
temperature = 0.5

# Request timeout in seconds
timeout_secs = 60

[session]
# Lines of command output kept as conversation context
buffer_lines = 40

# Lines sent with each question or explanation request
context_lines = 20

# Explain detected errors without asking (default: false)
auto_explain = false

[classifier]
# Extra command names that should always run as shell commands
extra_commands = []

# Environment variable overrides:
# GROQ_API_KEY / OPENAI_API_KEY / OPENROUTER_API_KEY - API credential
# TERMPILOT_PROVIDER=openai     - Select provider
# TERMPILOT_MODEL=<name>        - Select model
# TERMPILOT_AUTO_EXPLAIN=1      - Explain errors without asking
"#
    .to_string()
}

/// Print the default config to stdout
pub fn print_default_config() {
    print!("{}", generate_default_config());
}
