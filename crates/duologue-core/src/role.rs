// Speaker role tags
//
// The role tag doubles as the persona identity within a conversation and as
// the basis for the provider-facing role label. It is a closed enum: the wire
// only ever carries "user" or "assistant".

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Role tag attached to every message and persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    User,
    Assistant,
}

impl SpeakerRole {
    /// Provider-accepted role label for this tag
    pub fn provider_tag(self) -> &'static str {
        match self {
            SpeakerRole::User => "user",
            SpeakerRole::Assistant => "assistant",
        }
    }

    /// Mapping used when an upstream API rejects two consecutive "user" turns:
    /// every user-tagged entry is relabeled to "assistant" before being sent.
    pub fn relabel_user_as_assistant(self) -> SpeakerRole {
        match self {
            SpeakerRole::User => SpeakerRole::Assistant,
            other => other,
        }
    }
}

impl std::fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.provider_tag())
    }
}

impl From<&str> for SpeakerRole {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "assistant" => SpeakerRole::Assistant,
            _ => SpeakerRole::User,
        }
    }
}
