// Durable conversation CRUD HTTP routes
//
// Mounted only when DATABASE_URL is configured. Conversations are document
// shaped: participant descriptors, an append-only message array, a running
// message count, and creation/update timestamps.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use duologue_core::SpeakerRole;
use duologue_storage::{
    ConversationRow, ConversationSummaryRow, CreateConversation, CreateStoredMessage, Database,
    StoredMessageRow,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// App state for durable conversation routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create durable conversation routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/conversations",
            post(create_conversation).get(list_conversations),
        )
        .route(
            "/v1/conversations/:id",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/v1/conversations/:id/messages", post(append_message))
        .with_state(state)
}

// ============================================
// DTOs
// ============================================

/// Request to create a conversation (the UI's config shape)
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    /// Model identifier used by both personas.
    pub model: String,
    /// Display name of the user-role persona.
    pub agent1_name: String,
    /// System prompt of the user-role persona.
    pub agent1_prompt: String,
    /// Display name of the assistant-role persona.
    pub agent2_name: String,
    /// System prompt of the assistant-role persona.
    pub agent2_prompt: String,
    /// Conversation topic shown in list views.
    #[serde(default = "default_topic")]
    pub topic: String,
}

fn default_topic() -> String {
    "General Discussion".to_string()
}

/// Request to append a message to a stored conversation
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AppendMessageRequest {
    pub role: SpeakerRole,
    pub content: String,
}

/// Participant descriptor
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Participant {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Full stored conversation, including its message array
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationDetail {
    pub id: Uuid,
    pub topic: String,
    pub model: String,
    pub user_agent: Participant,
    pub assistant_agent: Participant,
    pub message_count: i32,
    pub messages: Vec<StoredMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary entry for the paginated list view (prompts omitted)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub topic: String,
    pub model: String,
    pub user_agent: Participant,
    pub assistant_agent: Participant,
    pub message_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored message
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StoredMessage {
    pub id: Uuid,
    pub sequence: i32,
    pub role: String,
    pub content: String,
    /// Epoch millis
    pub timestamp: i64,
}

/// Paginated conversation list
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversationsPage {
    pub data: Vec<ConversationSummary>,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
}

/// Query parameters for the conversation list
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 20, capped at 100.
    pub limit: Option<i64>,
}

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

impl From<StoredMessageRow> for StoredMessage {
    fn from(row: StoredMessageRow) -> Self {
        Self {
            id: row.id,
            sequence: row.sequence,
            role: row.role,
            content: row.content,
            timestamp: row.created_at.timestamp_millis(),
        }
    }
}

impl From<ConversationSummaryRow> for ConversationSummary {
    fn from(row: ConversationSummaryRow) -> Self {
        Self {
            id: row.id,
            topic: row.topic,
            model: row.model,
            user_agent: Participant {
                name: row.user_agent_name,
                prompt: None,
            },
            assistant_agent: Participant {
                name: row.assistant_agent_name,
                prompt: None,
            },
            message_count: row.message_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn detail(row: ConversationRow, messages: Vec<StoredMessageRow>) -> ConversationDetail {
    ConversationDetail {
        id: row.id,
        topic: row.topic,
        model: row.model,
        user_agent: Participant {
            name: row.user_agent_name,
            prompt: Some(row.user_agent_prompt),
        },
        assistant_agent: Participant {
            name: row.assistant_agent_name,
            prompt: Some(row.assistant_agent_prompt),
        },
        message_count: row.message_count,
        messages: messages.into_iter().map(StoredMessage::from).collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Malformed identifiers are indistinguishable from unknown ones: not found.
fn parse_id(id: &str) -> Result<Uuid, StatusCode> {
    Uuid::parse_str(id).map_err(|_| StatusCode::NOT_FOUND)
}

// ============================================
// Handlers
// ============================================

/// POST /v1/conversations - Create a conversation
#[utoipa::path(
    post,
    path = "/v1/conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 201, description = "Conversation created", body = ConversationDetail),
        (status = 500, description = "Internal server error")
    ),
    tag = "conversations"
)]
pub async fn create_conversation(
    State(state): State<AppState>,
    Json(req): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationDetail>), StatusCode> {
    let row = state
        .db
        .create_conversation(CreateConversation {
            topic: req.topic,
            model: req.model,
            user_agent_name: req.agent1_name,
            user_agent_prompt: req.agent1_prompt,
            assistant_agent_name: req.agent2_name,
            assistant_agent_prompt: req.agent2_prompt,
        })
        .await
        .map_err(|e| {
            tracing::error!("failed to create conversation: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok((StatusCode::CREATED, Json(detail(row, Vec::new()))))
}

/// GET /v1/conversations - Paginated list, most recently updated first
#[utoipa::path(
    get,
    path = "/v1/conversations",
    params(ListQuery),
    responses(
        (status = 200, description = "Conversation summaries", body = ConversationsPage),
        (status = 500, description = "Internal server error")
    ),
    tag = "conversations"
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ConversationsPage>, StatusCode> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let rows = state.db.list_conversations(page, limit).await.map_err(|e| {
        tracing::error!("failed to list conversations: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let total = state.db.count_conversations().await.map_err(|e| {
        tracing::error!("failed to count conversations: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ConversationsPage {
        data: rows.into_iter().map(ConversationSummary::from).collect(),
        page,
        limit,
        total,
    }))
}

/// GET /v1/conversations/{id} - Fetch one conversation with its messages
#[utoipa::path(
    get,
    path = "/v1/conversations/{id}",
    params(("id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Conversation found", body = ConversationDetail),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "conversations"
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationDetail>, StatusCode> {
    let id = parse_id(&id)?;

    let row = state
        .db
        .get_conversation(id)
        .await
        .map_err(|e| {
            tracing::error!("failed to get conversation: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    let messages = state.db.list_messages(id).await.map_err(|e| {
        tracing::error!("failed to list messages: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(detail(row, messages)))
}

/// POST /v1/conversations/{id}/messages - Append a message
#[utoipa::path(
    post,
    path = "/v1/conversations/{id}/messages",
    params(("id" = String, Path, description = "Conversation ID")),
    request_body = AppendMessageRequest,
    responses(
        (status = 201, description = "Message appended", body = StoredMessage),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "conversations"
)]
pub async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AppendMessageRequest>,
) -> Result<(StatusCode, Json<StoredMessage>), StatusCode> {
    let id = parse_id(&id)?;

    let row = state
        .db
        .append_message(CreateStoredMessage {
            conversation_id: id,
            role: req.role.to_string(),
            content: req.content,
        })
        .await
        .map_err(|e| {
            tracing::error!("failed to append message: {e}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok((StatusCode::CREATED, Json(StoredMessage::from(row))))
}

/// DELETE /v1/conversations/{id} - Delete a conversation
#[utoipa::path(
    delete,
    path = "/v1/conversations/{id}",
    params(("id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 204, description = "Conversation deleted"),
        (status = 404, description = "Conversation not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "conversations"
)]
pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    let id = parse_id(&id)?;

    let deleted = state.db.delete_conversation(id).await.map_err(|e| {
        tracing::error!("failed to delete conversation: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}
