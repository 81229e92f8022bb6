// Database models (internal, may differ from public DTOs)

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================
// Conversation models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct ConversationRow {
    pub id: Uuid,
    pub topic: String,
    pub model: String,
    pub user_agent_name: String,
    pub user_agent_prompt: String,
    pub assistant_agent_name: String,
    pub assistant_agent_prompt: String,
    pub message_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Summary row for list views (prompts omitted)
#[derive(Debug, Clone, FromRow)]
pub struct ConversationSummaryRow {
    pub id: Uuid,
    pub topic: String,
    pub model: String,
    pub user_agent_name: String,
    pub assistant_agent_name: String,
    pub message_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateConversation {
    pub topic: String,
    pub model: String,
    pub user_agent_name: String,
    pub user_agent_prompt: String,
    pub assistant_agent_name: String,
    pub assistant_agent_prompt: String,
}

// ============================================
// Message models
// ============================================

#[derive(Debug, Clone, FromRow)]
pub struct StoredMessageRow {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sequence: i32,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateStoredMessage {
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
}
