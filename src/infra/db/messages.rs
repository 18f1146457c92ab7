use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{CreateMessageParams, MessagesRepo, RepoError},
    domain::entities::{MessageRecord, MessageView},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct MessageRow {
    id: i64,
    profile_id: Option<i64>,
    subject: String,
    message: String,
    created_at: OffsetDateTime,
}

impl From<MessageRow> for MessageRecord {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            profile_id: row.profile_id,
            subject: row.subject,
            message: row.message,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MessageViewRow {
    #[sqlx(flatten)]
    message: MessageRow,
    user_name: Option<String>,
}

impl From<MessageViewRow> for MessageView {
    fn from(row: MessageViewRow) -> Self {
        Self {
            message: row.message.into(),
            user_name: row.user_name,
        }
    }
}

#[async_trait]
impl MessagesRepo for PostgresRepositories {
    async fn create_message(
        &self,
        params: CreateMessageParams,
    ) -> Result<MessageRecord, RepoError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (profile_id, subject, message)
            VALUES ($1, $2, $3)
            RETURNING id, profile_id, subject, message, created_at
            "#,
        )
        .bind(params.profile_id)
        .bind(params.subject)
        .bind(params.message)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn list_messages(&self) -> Result<Vec<MessageView>, RepoError> {
        let rows = sqlx::query_as::<_, MessageViewRow>(
            r#"
            SELECT m.id, m.profile_id, m.subject, m.message, m.created_at, p.name AS user_name
            FROM messages m
            LEFT JOIN profiles p ON p.id = m.profile_id
            ORDER BY m.created_at DESC, m.id DESC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(MessageView::from).collect())
    }

    async fn find_message(&self, id: i64) -> Result<Option<MessageView>, RepoError> {
        let row = sqlx::query_as::<_, MessageViewRow>(
            r#"
            SELECT m.id, m.profile_id, m.subject, m.message, m.created_at, p.name AS user_name
            FROM messages m
            LEFT JOIN profiles p ON p.id = m.profile_id
            WHERE m.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(MessageView::from))
    }
}
