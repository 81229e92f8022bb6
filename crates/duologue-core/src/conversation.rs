// Conversation log
//
// Append-only, insertion-ordered log of role-tagged messages. The log is the
// single source of truth for conversation order; views are pure projections
// and never cached against future mutation.

use crate::message::Message;
use crate::role::SpeakerRole;

/// Options for projecting the log into a provider-facing history
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewOptions {
    /// Drop timestamps from each entry
    pub exclude_timestamp: bool,
    /// Relabel user-tagged entries as assistant (for upstream APIs that
    /// reject consecutive user turns). Stored state is never altered.
    pub relabel_user_as_assistant: bool,
}

/// A projected log entry, reduced for provider consumption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: SpeakerRole,
    pub content: String,
    pub timestamp_ms: Option<i64>,
}

/// Ordered, append-only conversation log
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message with a freshly captured timestamp.
    ///
    /// Timestamps are clamped to be non-decreasing even if the wall clock
    /// steps backwards between appends.
    pub fn append(&mut self, role: SpeakerRole, content: impl Into<String>) -> &Message {
        let mut msg = Message::now(role, content);
        if let Some(last) = self.messages.last() {
            if msg.timestamp_ms < last.timestamp_ms {
                msg.timestamp_ms = last.timestamp_ms;
            }
        }
        self.messages.push(msg);
        // Safe: we just pushed
        &self.messages[self.messages.len() - 1]
    }

    /// Filtered projection of all messages. Never mutates the log.
    pub fn view(&self, opts: ViewOptions) -> Vec<HistoryEntry> {
        self.messages
            .iter()
            .map(|m| HistoryEntry {
                role: if opts.relabel_user_as_assistant {
                    m.role.relabel_user_as_assistant()
                } else {
                    m.role
                },
                content: m.content.clone(),
                timestamp_ms: if opts.exclude_timestamp {
                    None
                } else {
                    Some(m.timestamp_ms)
                },
            })
            .collect()
    }

    /// Wholesale reset to empty. Idempotent.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Role tag of the most recent message, if any
    pub fn last_role(&self) -> Option<SpeakerRole> {
        self.messages.last().map(|m| m.role)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_preserves_insertion_order() {
        let mut log = ConversationLog::new();
        log.append(SpeakerRole::User, "one");
        log.append(SpeakerRole::Assistant, "two");
        log.append(SpeakerRole::User, "three");

        let view = log.view(ViewOptions::default());
        let contents: Vec<&str> = view.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_timestamps_non_decreasing() {
        let mut log = ConversationLog::new();
        for i in 0..20 {
            log.append(SpeakerRole::User, format!("msg {i}"));
        }
        let stamps: Vec<i64> = log.messages().iter().map(|m| m.timestamp_ms).collect();
        assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_view_exclude_timestamp() {
        let mut log = ConversationLog::new();
        log.append(SpeakerRole::User, "hi");

        let with = log.view(ViewOptions::default());
        assert!(with[0].timestamp_ms.is_some());

        let without = log.view(ViewOptions {
            exclude_timestamp: true,
            ..Default::default()
        });
        assert!(without[0].timestamp_ms.is_none());
    }

    #[test]
    fn test_relabel_preserves_count_and_content() {
        let mut log = ConversationLog::new();
        log.append(SpeakerRole::User, "a");
        log.append(SpeakerRole::Assistant, "b");
        log.append(SpeakerRole::User, "c");

        let view = log.view(ViewOptions {
            relabel_user_as_assistant: true,
            ..Default::default()
        });

        assert_eq!(view.len(), 3);
        assert!(view.iter().all(|e| e.role == SpeakerRole::Assistant));
        let contents: Vec<&str> = view.iter().map(|e| e.content.as_str()).collect();
        assert_eq!(contents, vec!["a", "b", "c"]);
        // stored state untouched
        assert_eq!(log.messages()[0].role, SpeakerRole::User);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut log = ConversationLog::new();
        log.append(SpeakerRole::User, "hello");
        log.clear();
        assert!(log.view(ViewOptions::default()).is_empty());
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.last_role(), None);
    }
}
