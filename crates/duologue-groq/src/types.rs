// Groq wire types
//
// Groq speaks the OpenAI chat-completion protocol; these types cover the
// subset this system uses (text-only, streaming).

use serde::{Deserialize, Serialize};

/// Chat completion request body
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<GroqMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub max_completion_tokens: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroqMessage {
    pub role: String,
    pub content: String,
}

// Streaming types

#[derive(Debug, Clone, Deserialize)]
pub struct StreamChunk {
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamChoice {
    pub delta: StreamDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "moonshotai/kimi-k2-instruct".to_string(),
            messages: vec![GroqMessage {
                role: "system".to_string(),
                content: "You are a therapist.".to_string(),
            }],
            temperature: 1.0,
            top_p: 1.0,
            max_completion_tokens: 8192,
            stream: true,
            stop: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "moonshotai/kimi-k2-instruct");
        assert_eq!(json["max_completion_tokens"], 8192);
        assert_eq!(json["stream"], true);
        // no stop sequences are ever sent
        assert!(json.get("stop").is_none());
    }

    #[test]
    fn test_stream_chunk_parsing() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#).unwrap();
        assert_eq!(chunk.choices[0].delta.content.as_deref(), Some("Hel"));
        assert!(chunk.choices[0].finish_reason.is_none());
    }

    #[test]
    fn test_stream_chunk_finish_reason() {
        let chunk: StreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{},"finish_reason":"stop"}]}"#).unwrap();
        assert!(chunk.choices[0].delta.content.is_none());
        assert_eq!(chunk.choices[0].finish_reason.as_deref(), Some("stop"));
    }
}
