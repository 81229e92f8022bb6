// Completion provider trait
//
// The remote chat-completion API is an opaque external collaborator. The
// trait is stream-first: buffered replies are built by collecting the stream,
// which is also how the upstream SDKs behave.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::conversation::HistoryEntry;
use crate::error::Result;
use crate::role::SpeakerRole;

/// Type alias for the completion response stream
pub type CompletionStream = Pin<Box<dyn Stream<Item = Result<CompletionEvent>> + Send>>;

/// Events emitted while a completion streams in
#[derive(Debug, Clone)]
pub enum CompletionEvent {
    /// Incremental text fragment
    TextDelta(String),
    /// Streaming completed
    Done,
    /// Error reported inside the stream
    Error(String),
}

/// One {role, content} turn as the provider expects it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: SpeakerRole,
    pub content: String,
}

impl From<&HistoryEntry> for ChatTurn {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            role: entry.role,
            content: entry.content.clone(),
        }
    }
}

/// A single completion request: system instruction plus prior turns
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model identifier
    pub model: String,
    /// System instruction prepended ahead of the history
    pub system: String,
    /// Prior turns, timestamps already stripped
    pub messages: Vec<ChatTurn>,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling spread
    pub top_p: f32,
    /// Bound on generated tokens
    pub max_tokens: u32,
}

/// Trait for remote chat-completion providers
///
/// Implementations handle provider-specific API calls and response parsing.
/// Retries and availability are explicitly not this trait's responsibility.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Issue the completion request, yielding text fragments as they arrive.
    /// The stream is finite and non-restartable.
    async fn chat_completion_stream(&self, request: CompletionRequest)
        -> Result<CompletionStream>;
}
