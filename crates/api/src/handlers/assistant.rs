//! Handler for the site chat assistant.
//!
//! The conversation is relayed to the configured provider without retries.
//! Provider errors keep their status code; an unreachable provider is a 502.

use axum::extract::State;
use axum::Json;
use protolab_assistant::{ChatMessage, ChatReply};
use protolab_core::validation::{ensure_valid, push_error, FieldErrors};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::response::DataResponse;
use crate::state::AppState;

/// Roles a conversation turn may carry.
pub const VALID_ROLES: &[&str] = &["system", "user", "assistant"];

/// Maximum number of turns relayed in one request.
pub const MAX_MESSAGES: usize = 50;

/// Maximum length of one turn, in characters.
pub const MAX_MESSAGE_CHARS: usize = 10_000;

/// Body of `POST /assistant/chat`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

/// Every problem with the conversation, keyed like the other validators
/// (`messages`, `messages[2].role`).
pub fn check_messages(messages: &[ChatMessage]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if messages.is_empty() || messages.len() > MAX_MESSAGES {
        push_error(
            &mut errors,
            "messages",
            format!("must contain between 1 and {MAX_MESSAGES} messages"),
        );
    }
    for (idx, message) in messages.iter().enumerate() {
        if !VALID_ROLES.contains(&message.role.as_str()) {
            push_error(
                &mut errors,
                &format!("messages[{idx}].role"),
                format!("must be one of: {}", VALID_ROLES.join(", ")),
            );
        }
        let len = message.content.trim().chars().count();
        if len == 0 || message.content.chars().count() > MAX_MESSAGE_CHARS {
            push_error(
                &mut errors,
                &format!("messages[{idx}].content"),
                format!("must be between 1 and {MAX_MESSAGE_CHARS} characters"),
            );
        }
    }
    errors
}

/// POST /api/v1/assistant/chat
pub async fn chat(
    State(state): State<AppState>,
    AppJson(input): AppJson<ChatRequest>,
) -> AppResult<Json<DataResponse<ChatReply>>> {
    ensure_valid(check_messages(&input.messages))?;

    let reply = state.assistant.chat(&input.messages).await?;

    tracing::info!(
        provider = reply.provider,
        model = %reply.model,
        message_count = input.messages.len(),
        "Assistant reply relayed",
    );
    Ok(Json(DataResponse { data: reply }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: &str, content: &str) -> ChatMessage {
        ChatMessage {
            role: role.into(),
            content: content.into(),
        }
    }

    #[test]
    fn well_formed_conversation_passes() {
        let messages = [msg("system", "Be brief."), msg("user", "Do you make PCBs?")];
        assert!(check_messages(&messages).is_empty());
    }

    #[test]
    fn empty_and_oversized_conversations_fail() {
        assert!(check_messages(&[]).contains_key("messages"));
        let many = vec![msg("user", "hi"); MAX_MESSAGES + 1];
        assert!(check_messages(&many).contains_key("messages"));
        assert!(check_messages(&many[..MAX_MESSAGES]).is_empty());
    }

    #[test]
    fn bad_turns_are_reported_by_index() {
        let messages = [msg("user", "ok"), msg("tool", "x"), msg("user", "   ")];
        let errors = check_messages(&messages);
        assert!(errors.contains_key("messages[1].role"));
        assert!(errors.contains_key("messages[2].content"));
        assert!(!errors.contains_key("messages[0].role"));
    }
}
