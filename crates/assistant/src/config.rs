//! Provider selection and environment configuration.

use std::time::Duration;

use crate::AssistantError;

/// Default OpenAI-compatible base URL.
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";

/// Default upstream timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which chat backend to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenAi,
    Ollama,
}

impl Provider {
    /// Parse `openai` / `ollama` (case-insensitive).
    pub fn parse(value: &str) -> Result<Self, AssistantError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "ollama" => Ok(Provider::Ollama),
            other => Err(AssistantError::Config(format!(
                "unknown AI_PROVIDER '{other}' (expected 'openai' or 'ollama')"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        }
    }
}

/// Settings for the chat relay.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub provider: Provider,
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Bearer token (OpenAI only).
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl AssistantConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable          | Default                  |
    /// |-------------------|--------------------------|
    /// | `AI_PROVIDER`     | `openai`                 |
    /// | `OPENAI_BASE_URL` | `https://api.openai.com` |
    /// | `OPENAI_API_KEY`  | none                     |
    /// | `OPENAI_MODEL`    | `gpt-4o-mini`            |
    /// | `OLLAMA_BASE_URL` | `http://localhost:11434` |
    /// | `OLLAMA_MODEL`    | `llama3`                 |
    /// | `AI_TIMEOUT_SECS` | `60`                     |
    pub fn from_env() -> Result<Self, AssistantError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AssistantError> {
        let provider = match lookup("AI_PROVIDER") {
            Some(value) => Provider::parse(&value)?,
            None => Provider::OpenAi,
        };

        let timeout_secs = match lookup("AI_TIMEOUT_SECS") {
            Some(value) => value.parse::<u64>().map_err(|_| {
                AssistantError::Config(format!("AI_TIMEOUT_SECS must be a number, got '{value}'"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let (base_url, api_key, model) = match provider {
            Provider::OpenAi => (
                lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.into()),
                lookup("OPENAI_API_KEY").filter(|k| !k.is_empty()),
                lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into()),
            ),
            Provider::Ollama => (
                lookup("OLLAMA_BASE_URL").unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.into()),
                None,
                lookup("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.into()),
            ),
        };

        Ok(Self {
            provider,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
