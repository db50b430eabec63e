//! Chat-completion relay to an OpenAI-compatible API or a local Ollama server.

pub mod client;
pub mod config;

pub use client::{ChatClient, ChatMessage, ChatReply};
pub use config::{AssistantConfig, Provider};

/// Errors from the assistant relay.
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider error ({status}): {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The provider answered 2xx but the body lacked a reply.
    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("Assistant configuration error: {0}")]
    Config(String),
}
