//! HTTP client for the configured chat provider.
//!
//! OpenAI-compatible servers are called at `POST {base}/v1/chat/completions`
//! and answer in `choices[0].message.content`. Ollama is called at
//! `POST {base}/api/chat` with `stream: false` and answers in
//! `message.content`.

use serde::{Deserialize, Serialize};

use crate::config::{AssistantConfig, Provider};
use crate::AssistantError;

/// One turn of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// The relayed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub provider: &'static str,
    pub model: String,
}

/// Chat relay bound to one provider.
pub struct ChatClient {
    client: reqwest::Client,
    config: AssistantConfig,
}

impl ChatClient {
    /// Create a client with the configured request timeout.
    pub fn new(config: AssistantConfig) -> Result<Self, AssistantError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn provider(&self) -> Provider {
        self.config.provider
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send the conversation and return the assistant's reply.
    ///
    /// No retries: a non-2xx answer becomes [`AssistantError::Upstream`]
    /// carrying the provider's status and body.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<ChatReply, AssistantError> {
        let url = endpoint(&self.config);
        let body = request_body(self.config.provider, &self.config.model, messages);

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!(
            provider = self.config.provider.as_str(),
            model = %self.config.model,
            messages = messages.len(),
            "Relaying chat request"
        );

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(status = status.as_u16(), "Chat provider returned an error");
            return Err(AssistantError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let reply = extract_reply(self.config.provider, &payload)?;
        Ok(ChatReply {
            reply,
            provider: self.config.provider.as_str(),
            model: self.config.model.clone(),
        })
    }
}

// ---- private helpers ----

fn endpoint(config: &AssistantConfig) -> String {
    match config.provider {
        Provider::OpenAi => format!("{}/v1/chat/completions", config.base_url),
        Provider::Ollama => format!("{}/api/chat", config.base_url),
    }
}

fn request_body(provider: Provider, model: &str, messages: &[ChatMessage]) -> serde_json::Value {
    match provider {
        Provider::OpenAi => serde_json::json!({
            "model": model,
            "messages": messages,
        }),
        Provider::Ollama => serde_json::json!({
            "model": model,
            "messages": messages,
            "stream": false,
        }),
    }
}

fn extract_reply(provider: Provider, payload: &serde_json::Value) -> Result<String, AssistantError> {
    let content = match provider {
        Provider::OpenAi => payload.pointer("/choices/0/message/content"),
        Provider::Ollama => payload.pointer("/message/content"),
    };
    content
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            AssistantError::InvalidResponse(format!(
                "{} response has no message content",
                provider.as_str()
            ))
        })
}
