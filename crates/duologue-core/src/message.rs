// Message types
//
// Message represents a single turn in the conversation log. Immutable once
// appended; timestamps are integer epoch millis (the front-end contract).

use crate::role::SpeakerRole;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Message {
    /// Unique message ID
    pub id: Uuid,

    /// Role tag of the speaker
    pub role: SpeakerRole,

    /// Message text
    pub content: String,

    /// Creation time as epoch millis
    pub timestamp_ms: i64,
}

impl Message {
    /// Create a message with a freshly captured timestamp
    pub fn now(role: SpeakerRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            role,
            content: content.into(),
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(SpeakerRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::now(SpeakerRole::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, SpeakerRole::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.timestamp_ms > 0);
    }

    #[test]
    fn test_assistant_message() {
        let msg = Message::assistant("Hi there!");
        assert_eq!(msg.role, SpeakerRole::Assistant);
        assert_eq!(msg.content, "Hi there!");
    }
}
