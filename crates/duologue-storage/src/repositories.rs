// Repository layer for database operations

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending schema migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // ============================================
    // Conversations
    // ============================================

    pub async fn create_conversation(&self, input: CreateConversation) -> Result<ConversationRow> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            INSERT INTO conversations (topic, model, user_agent_name, user_agent_prompt, assistant_agent_name, assistant_agent_prompt)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, topic, model, user_agent_name, user_agent_prompt, assistant_agent_name, assistant_agent_prompt, message_count, created_at, updated_at
            "#,
        )
        .bind(&input.topic)
        .bind(&input.model)
        .bind(&input.user_agent_name)
        .bind(&input.user_agent_prompt)
        .bind(&input.assistant_agent_name)
        .bind(&input.assistant_agent_prompt)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_conversation(&self, id: Uuid) -> Result<Option<ConversationRow>> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, topic, model, user_agent_name, user_agent_prompt, assistant_agent_name, assistant_agent_prompt, message_count, created_at, updated_at
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// List conversation summaries, most recently updated first
    pub async fn list_conversations(
        &self,
        page: i64,
        limit: i64,
    ) -> Result<Vec<ConversationSummaryRow>> {
        let offset = (page - 1).max(0) * limit;

        let rows = sqlx::query_as::<_, ConversationSummaryRow>(
            r#"
            SELECT id, topic, model, user_agent_name, assistant_agent_name, message_count, created_at, updated_at
            FROM conversations
            ORDER BY updated_at DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(offset)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_conversations(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    pub async fn delete_conversation(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Messages (append-only per conversation)
    // ============================================

    /// Append a message and bump the conversation's message_count/updated_at
    /// in one transaction. Returns None when the conversation does not exist.
    pub async fn append_message(
        &self,
        input: CreateStoredMessage,
    ) -> Result<Option<StoredMessageRow>> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE conversations
            SET message_count = message_count + 1, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(input.conversation_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query_as::<_, StoredMessageRow>(
            r#"
            INSERT INTO conversation_messages (conversation_id, sequence, role, content)
            VALUES ($1, COALESCE((SELECT MAX(sequence) + 1 FROM conversation_messages WHERE conversation_id = $1), 1), $2, $3)
            RETURNING id, conversation_id, sequence, role, content, created_at
            "#,
        )
        .bind(input.conversation_id)
        .bind(&input.role)
        .bind(&input.content)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(row))
    }

    pub async fn list_messages(&self, conversation_id: Uuid) -> Result<Vec<StoredMessageRow>> {
        let rows = sqlx::query_as::<_, StoredMessageRow>(
            r#"
            SELECT id, conversation_id, sequence, role, content, created_at
            FROM conversation_messages
            WHERE conversation_id = $1
            ORDER BY sequence ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
