//! Delivery-side abstraction over chat backends.
//!
//! The pipeline talks to whoever asked for a file through the
//! [`Transport`] trait: plain text replies, file attachments, and a
//! progress reaction on the originating message. The bundled binary
//! ships a console transport; a real chat backend implements the same
//! trait without touching the pipeline.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

/// Identifier of a chat the bot participates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub u64);

/// Identifier of a single message within a chat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

/// Errors surfaced by a transport backend.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The backend could not carry out a delivery action.
    #[error("transport failed to {action}: {reason}")]
    Delivery {
        /// What was being attempted, e.g. "send file".
        action: String,
        /// Backend-specific failure description.
        reason: String,
    },
}

impl TransportError {
    /// Creates a delivery error.
    pub fn delivery(action: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Delivery {
            action: action.into(),
            reason: reason.into(),
        }
    }
}

/// A chat backend capable of receiving the bot's replies.
///
/// Implementations must be shareable across jobs. Reaction calls mark
/// a message as in progress and are advisory; a backend without
/// reactions may implement them as no-ops.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Short backend name for log lines.
    fn name(&self) -> &'static str;

    /// Sends a text reply into the chat.
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<(), TransportError>;

    /// Sends the file at `path` into the chat as an attachment.
    async fn send_file(&self, chat: ChatId, path: &Path) -> Result<(), TransportError>;

    /// Marks `message` with a progress reaction.
    async fn set_reaction(
        &self,
        chat: ChatId,
        message: MessageId,
        reaction: &str,
    ) -> Result<(), TransportError>;

    /// Removes any reaction previously set on `message`.
    async fn clear_reaction(&self, chat: ChatId, message: MessageId)
    -> Result<(), TransportError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_error_names_action_and_reason() {
        let error = TransportError::delivery("send file", "connection reset");
        let message = error.to_string();
        assert!(message.contains("send file"));
        assert!(message.contains("connection reset"));
    }

    #[test]
    fn test_ids_are_copy_and_comparable() {
        let chat = ChatId(42);
        let same = chat;
        assert_eq!(chat, same);
        assert_ne!(MessageId(1), MessageId(2));
    }
}
