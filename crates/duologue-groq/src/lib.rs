// Groq provider for Duologue
//
// Implements the CompletionProvider trait against Groq's OpenAI-compatible
// chat completion endpoint, with SSE streaming.

pub mod provider;
pub mod types;

pub use provider::GroqProvider;
