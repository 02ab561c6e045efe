use std::pin::Pin;

use futures::Stream;

/// Chat model provider abstraction
///
/// Providers open a streaming completion for a fully composed conversation
/// and expose it as a lazy, finite, non-restartable sequence of text
/// segments. The relay forwards that sequence 1:1 onto the wire; tests swap
/// in scripted providers.
use crate::error::AppResult;
use crate::models::ChatMessage;

pub mod gemini;

/// Lazy sequence of upstream text segments
///
/// Ends after the upstream finishes; yields at most one `Err` and nothing
/// after it.
pub type ChunkStream = Pin<Box<dyn Stream<Item = AppResult<String>> + Send>>;

/// A fully composed conversation turn, ready for the upstream model
///
/// The grounding text and its scripted acknowledgment lead the conversation;
/// `history` is already truncated to the relay's context window.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub system_prompt: String,
    pub acknowledgment: String,
    pub history: Vec<ChatMessage>,
    pub message: String,
}

/// Trait for streaming chat model providers
#[async_trait::async_trait]
pub trait ChatProvider: Send + Sync {
    /// Whether the provider has the credentials it needs
    ///
    /// Checked before any request work so a missing credential surfaces as a
    /// configuration error rather than a failed upstream call.
    fn is_configured(&self) -> bool {
        true
    }

    /// Opens a streaming completion for the turn
    ///
    /// Errors returned here happened before any content was produced; errors
    /// yielded inside the stream happened mid-generation.
    async fn stream_chat(&self, turn: ChatTurn) -> AppResult<ChunkStream>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
