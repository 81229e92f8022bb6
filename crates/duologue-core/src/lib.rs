// Turn-Based Dialogue Abstraction
//
// This crate provides a provider-agnostic implementation of a scripted
// two-or-more-persona dialogue loop (select speaker → LLM call → append).
//
// Key design decisions:
// - CompletionProvider trait keeps the loop pluggable (Groq today, anything
//   OpenAI-shaped tomorrow) and mockable in tests
// - ConversationLog is an owned, injectable state object, not ambient state
// - SpeakerRole is a closed enum with an explicit provider-facing mapping
// - Turn selection fails loudly when no persona is eligible
// - Reasoning markup emitted by upstream models is stripped before storage

pub mod agent;
pub mod conversation;
pub mod error;
pub mod message;
pub mod orchestrator;
pub mod persona;
pub mod presets;
pub mod provider;
pub mod role;
pub mod turns;

// Re-exports for convenience
pub use agent::{strip_reasoning, Agent};
pub use conversation::{ConversationLog, HistoryEntry, ViewOptions};
pub use error::{DialogueError, Result};
pub use message::Message;
pub use orchestrator::DialogueOrchestrator;
pub use persona::Persona;
pub use presets::{find_preset, PersonaPreset, PERSONA_PRESETS};
pub use provider::{
    ChatTurn, CompletionEvent, CompletionProvider, CompletionRequest, CompletionStream,
};
pub use role::SpeakerRole;
pub use turns::{next_speaker, INITIATOR_ROLE};
