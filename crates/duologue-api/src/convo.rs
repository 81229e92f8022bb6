// Live conversation HTTP routes
//
// The in-process conversation: one shared log, one turn generated per
// /generate call. The orchestrator sits behind a tokio Mutex so concurrent
// requests serialize and never select against the same "last message".

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use duologue_core::{
    Agent, CompletionEvent, DialogueError, DialogueOrchestrator, HistoryEntry, Message,
    SpeakerRole,
};
use futures::{future, stream, Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, sync::Arc};
use tokio::sync::Mutex;
use utoipa::ToSchema;
use uuid::Uuid;

/// App state for live conversation routes
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Mutex<DialogueOrchestrator>>,
    /// Roster used by the stateless /stream endpoint (no log access needed)
    pub agents: Arc<Vec<Agent>>,
    pub metadata: ConversationMetadata,
}

/// Conversation metadata in the UI's wire shape
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMetadata {
    pub llm1_name: String,
    pub llm2_name: String,
    pub topic: String,
}

/// A message in the UI's wire shape
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WireMessage {
    pub id: Uuid,
    pub sender: SpeakerRole,
    pub content: String,
    /// Epoch millis
    pub timestamp: i64,
}

impl From<&Message> for WireMessage {
    fn from(msg: &Message) -> Self {
        Self {
            id: msg.id,
            sender: msg.role,
            content: msg.content.clone(),
            timestamp: msg.timestamp_ms,
        }
    }
}

/// Full conversation state plus metadata
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationData {
    pub messages: Vec<WireMessage>,
    pub metadata: ConversationMetadata,
}

/// One prior turn supplied by the client for /stream
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StreamTurn {
    pub sender: SpeakerRole,
    pub content: String,
}

/// Request body for /stream: prior history plus who should speak next
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct StreamRequest {
    pub history: Vec<StreamTurn>,
    pub speaker: SpeakerRole,
}

/// Create live conversation routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/convo", get(get_conversation))
        .route("/generate", post(generate))
        .route("/convo/reset", post(reset_conversation))
        .route("/stream", post(stream_turn))
        .with_state(state)
}

fn error_status(err: &DialogueError) -> StatusCode {
    match err {
        DialogueError::Provider(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /convo - Full message list plus conversation metadata
#[utoipa::path(
    get,
    path = "/convo",
    responses(
        (status = 200, description = "Conversation state", body = ConversationData)
    ),
    tag = "conversation"
)]
pub async fn get_conversation(State(state): State<AppState>) -> Json<ConversationData> {
    let orchestrator = state.orchestrator.lock().await;
    let messages = orchestrator
        .log()
        .messages()
        .iter()
        .map(WireMessage::from)
        .collect();

    Json(ConversationData {
        messages,
        metadata: state.metadata.clone(),
    })
}

/// POST /generate - Select the next speaker, generate one turn, append it
#[utoipa::path(
    post,
    path = "/generate",
    responses(
        (status = 200, description = "The newly appended message", body = WireMessage),
        (status = 502, description = "Upstream completion provider failed"),
        (status = 500, description = "No eligible speaker or internal error")
    ),
    tag = "conversation"
)]
pub async fn generate(
    State(state): State<AppState>,
) -> Result<Json<WireMessage>, StatusCode> {
    let mut orchestrator = state.orchestrator.lock().await;

    let message = orchestrator.step().await.map_err(|e| {
        tracing::error!("failed to generate turn: {e}");
        error_status(&e)
    })?;

    Ok(Json(WireMessage::from(&message)))
}

/// POST /convo/reset - Clear the conversation log
#[utoipa::path(
    post,
    path = "/convo/reset",
    responses(
        (status = 200, description = "Conversation cleared")
    ),
    tag = "conversation"
)]
pub async fn reset_conversation(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut orchestrator = state.orchestrator.lock().await;
    orchestrator.reset();
    tracing::info!("conversation log cleared");
    Json(serde_json::json!({ "ok": true }))
}

/// POST /stream - Generate one turn as an SSE fragment stream
///
/// Stateless: the client supplies the history and the speaker, nothing is
/// appended to the shared log. Fragments are forwarded as they arrive,
/// followed by an `event: done` sentinel. Dropping the connection stops
/// fragment consumption.
#[utoipa::path(
    post,
    path = "/stream",
    request_body = StreamRequest,
    responses(
        (status = 200, description = "Fragment stream", content_type = "text/event-stream"),
        (status = 400, description = "No persona speaks under the requested role"),
        (status = 502, description = "Upstream completion provider failed")
    ),
    tag = "conversation"
)]
pub async fn stream_turn(
    State(state): State<AppState>,
    Json(req): Json<StreamRequest>,
) -> Result<Sse<impl Stream<Item = Result<SseEvent, Infallible>>>, StatusCode> {
    let agent = state
        .agents
        .iter()
        .find(|a| a.persona().role == req.speaker)
        .ok_or(StatusCode::BAD_REQUEST)?;

    // Relabel user-tagged turns so the upstream API never sees two
    // consecutive "user" messages.
    let history: Vec<HistoryEntry> = req
        .history
        .iter()
        .map(|turn| HistoryEntry {
            role: turn.sender.relabel_user_as_assistant(),
            content: turn.content.clone(),
            timestamp_ms: None,
        })
        .collect();

    let reply_stream = agent.stream_reply(&history).await.map_err(|e| {
        tracing::error!("failed to start reply stream: {e}");
        error_status(&e)
    })?;

    let fragments = reply_stream
        .take_while(|event| {
            let done = matches!(event, Ok(CompletionEvent::Done));
            future::ready(!done)
        })
        .filter_map(|event| {
            future::ready(match event {
                Ok(CompletionEvent::TextDelta(delta)) if !delta.is_empty() => {
                    Some(Ok::<_, Infallible>(SseEvent::default().data(delta)))
                }
                Ok(CompletionEvent::TextDelta(_)) | Ok(CompletionEvent::Done) => None,
                Ok(CompletionEvent::Error(err)) => {
                    Some(Ok(SseEvent::default().event("error").data(err)))
                }
                Err(err) => Some(Ok(SseEvent::default().event("error").data(err.to_string()))),
            })
        });

    let done = stream::once(future::ready(Ok::<_, Infallible>(
        SseEvent::default().event("done").data("[DONE]"),
    )));

    Ok(Sse::new(fragments.chain(done)).keep_alive(KeepAlive::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use duologue_core::{
        CompletionProvider, CompletionRequest, CompletionStream, Persona, Result as CoreResult,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct CannedProvider;

    #[async_trait]
    impl CompletionProvider for CannedProvider {
        async fn chat_completion_stream(
            &self,
            _request: CompletionRequest,
        ) -> CoreResult<CompletionStream> {
            let events = vec![
                Ok(CompletionEvent::TextDelta("canned ".to_string())),
                Ok(CompletionEvent::TextDelta("reply".to_string())),
                Ok(CompletionEvent::Done),
            ];
            Ok(Box::pin(stream::iter(events)))
        }
    }

    fn test_state() -> AppState {
        let provider: Arc<dyn CompletionProvider> = Arc::new(CannedProvider);
        let build_roster = || {
            vec![
                Agent::new(
                    Persona::new("John", SpeakerRole::User, "Be John.", "test-model"),
                    provider.clone(),
                ),
                Agent::new(
                    Persona::new("Samantha", SpeakerRole::Assistant, "Be Samantha.", "test-model"),
                    provider.clone(),
                ),
            ]
        };

        AppState {
            orchestrator: Arc::new(Mutex::new(
                DialogueOrchestrator::new(build_roster()).unwrap(),
            )),
            agents: Arc::new(build_roster()),
            metadata: ConversationMetadata {
                llm1_name: "John".to_string(),
                llm2_name: "Samantha".to_string(),
                topic: "Two models in dialogue".to_string(),
            },
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_conversation_empty() {
        let app = routes(test_state());
        let response = app
            .oneshot(Request::builder().uri("/convo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let json = body_json(response).await;
        assert_eq!(json["messages"].as_array().unwrap().len(), 0);
        assert_eq!(json["metadata"]["llm1Name"], "John");
        assert_eq!(json["metadata"]["topic"], "Two models in dialogue");
    }

    #[tokio::test]
    async fn test_generate_alternates_roles() {
        let app = routes(test_state());

        let post = |uri: &str| {
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap()
        };

        // empty log: initiator speaks first
        let response = app.clone().oneshot(post("/generate")).await.unwrap();
        assert_eq!(response.status(), 200);
        let first = body_json(response).await;
        assert_eq!(first["sender"], "user");
        assert_eq!(first["content"], "canned reply");

        // second turn goes to the other persona
        let response = app.clone().oneshot(post("/generate")).await.unwrap();
        let second = body_json(response).await;
        assert_eq!(second["sender"], "assistant");
    }

    #[tokio::test]
    async fn test_reset_clears_log() {
        let app = routes(test_state());

        let generate = Request::builder()
            .method("POST")
            .uri("/generate")
            .body(Body::empty())
            .unwrap();
        app.clone().oneshot(generate).await.unwrap();

        let reset = Request::builder()
            .method("POST")
            .uri("/convo/reset")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(reset).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(body_json(response).await["ok"], true);

        let response = app
            .oneshot(Request::builder().uri("/convo").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["messages"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_stream_emits_fragments_and_done_sentinel() {
        let app = routes(test_state());

        let body = serde_json::json!({
            "history": [{ "sender": "user", "content": "Hello" }],
            "speaker": "assistant"
        });
        let request = Request::builder()
            .method("POST")
            .uri("/stream")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert!(response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/event-stream"));

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("data: canned "));
        assert!(text.contains("event: done"));
        assert!(text.contains("[DONE]"));
    }

    #[tokio::test]
    async fn test_stream_rejects_malformed_body() {
        let app = routes(test_state());

        let request = Request::builder()
            .method("POST")
            .uri("/stream")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"history": []}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert!(response.status().is_client_error());
    }
}
