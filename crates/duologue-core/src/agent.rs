// Agent: one persona bound to a completion provider
//
// The agent holds no conversation state of its own; history is always passed
// in explicitly. Sampling parameters mirror the deployed configuration:
// maximal temperature, full top-p spread, bounded output, no stop sequences.

use futures::StreamExt;
use regex::Regex;
use std::sync::{Arc, LazyLock};

use crate::conversation::HistoryEntry;
use crate::error::{DialogueError, Result};
use crate::persona::Persona;
use crate::provider::{
    ChatTurn, CompletionEvent, CompletionProvider, CompletionRequest, CompletionStream,
};

const TEMPERATURE: f32 = 1.0;
const TOP_P: f32 = 1.0;
const MAX_COMPLETION_TOKENS: u32 = 8192;

static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

/// Strip internal-reasoning markup some upstream models emit ahead of the
/// actual reply. Input without such markup is passed through unchanged.
pub fn strip_reasoning(text: &str) -> String {
    THINK_BLOCK.replace_all(text, "").into_owned()
}

pub struct Agent {
    persona: Persona,
    provider: Arc<dyn CompletionProvider>,
}

impl Agent {
    pub fn new(persona: Persona, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { persona, provider }
    }

    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    fn request(&self, history: &[HistoryEntry]) -> CompletionRequest {
        CompletionRequest {
            model: self.persona.model.clone(),
            system: self.persona.goal.clone(),
            messages: history.iter().map(ChatTurn::from).collect(),
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_COMPLETION_TOKENS,
        }
    }

    /// Buffered reply: collect the full streamed output into one string,
    /// strip reasoning markup, trim. Provider failures propagate as-is.
    pub async fn generate_reply(&self, history: &[HistoryEntry]) -> Result<String> {
        let mut stream = self
            .provider
            .chat_completion_stream(self.request(history))
            .await?;

        let mut reply = String::new();
        while let Some(event) = stream.next().await {
            match event? {
                CompletionEvent::TextDelta(delta) => reply.push_str(&delta),
                CompletionEvent::Done => break,
                CompletionEvent::Error(err) => return Err(DialogueError::provider(err)),
            }
        }

        Ok(strip_reasoning(&reply).trim().to_string())
    }

    /// Streaming reply: lazy, finite, non-restartable sequence of fragments.
    /// The caller decides what to do with partial output; nothing is stored.
    pub async fn stream_reply(&self, history: &[HistoryEntry]) -> Result<CompletionStream> {
        self.provider
            .chat_completion_stream(self.request(history))
            .await
    }
}
