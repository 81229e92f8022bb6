// Groq Provider Implementation
//
// Implements the CompletionProvider trait from duologue-core for Groq's
// OpenAI-compatible API.

use crate::types::{ChatRequest, GroqMessage, StreamChunk};
use anyhow::{Context, Result};
use async_trait::async_trait;
use duologue_core::{
    CompletionEvent, CompletionProvider, CompletionRequest, CompletionStream, DialogueError,
};
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;

const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

/// Groq LLM provider
pub struct GroqProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GroqProvider {
    /// Create a new Groq provider.
    /// Requires GROQ_API_KEY environment variable.
    pub fn new() -> Result<Self> {
        let api_key =
            std::env::var("GROQ_API_KEY").context("GROQ_API_KEY environment variable not set")?;
        Ok(Self::with_api_key(api_key))
    }

    /// Create a new Groq provider with a custom API key
    pub fn with_api_key(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GROQ_API_URL.to_string(),
        }
    }

    /// Override the endpoint URL (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Convert the core request into the Groq wire format: the persona's
    /// system instruction first, then the prior turns verbatim.
    fn build_request(request: &CompletionRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(GroqMessage {
            role: "system".to_string(),
            content: request.system.clone(),
        });
        messages.extend(request.messages.iter().map(|turn| GroqMessage {
            role: turn.role.provider_tag().to_string(),
            content: turn.content.clone(),
        }));

        ChatRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            top_p: request.top_p,
            max_completion_tokens: request.max_tokens,
            stream: true,
            stop: None,
        }
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn chat_completion_stream(
        &self,
        request: CompletionRequest,
    ) -> duologue_core::Result<CompletionStream> {
        let body = Self::build_request(&request);

        tracing::debug!(model = %body.model, messages = body.messages.len(), "calling Groq");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| DialogueError::provider(format!("failed to send Groq request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DialogueError::provider(format!(
                "Groq API request failed with status {status}: {error_text}"
            )));
        }

        // Parse the SSE body into completion events
        let event_stream = response.bytes_stream().eventsource();

        let converted = event_stream.map(|result| match result {
            Ok(event) => {
                // Groq sends [DONE] to signal completion
                if event.data == "[DONE]" {
                    return Ok(CompletionEvent::Done);
                }

                match serde_json::from_str::<StreamChunk>(&event.data) {
                    Ok(chunk) => {
                        if let Some(choice) = chunk.choices.first() {
                            if let Some(content) = &choice.delta.content {
                                return Ok(CompletionEvent::TextDelta(content.clone()));
                            }
                            if choice.finish_reason.is_some() {
                                return Ok(CompletionEvent::Done);
                            }
                        }
                        // No meaningful content in this chunk
                        Ok(CompletionEvent::TextDelta(String::new()))
                    }
                    Err(e) => Ok(CompletionEvent::Error(format!(
                        "failed to parse Groq chunk: {e}"
                    ))),
                }
            }
            Err(e) => Ok(CompletionEvent::Error(format!("stream error: {e}"))),
        });

        Ok(Box::pin(converted))
    }
}
