// Error types for the dialogue loop

use thiserror::Error;

/// Result type alias for dialogue operations
pub type Result<T> = std::result::Result<T, DialogueError>;

/// Errors that can occur while driving a conversation
#[derive(Debug, Error)]
pub enum DialogueError {
    /// Upstream completion provider error, surfaced verbatim
    #[error("provider error: {0}")]
    Provider(String),

    /// No persona may speak after the last message (configuration error)
    #[error("no eligible speaker for the next turn")]
    NoEligibleSpeaker,

    /// No personas configured at all
    #[error("persona roster is empty")]
    EmptyRoster,

    /// Configuration error
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl DialogueError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        DialogueError::Provider(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        DialogueError::Configuration(msg.into())
    }
}
