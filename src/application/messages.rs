use std::sync::Arc;

use tracing::info;

use crate::application::error::ServiceError;
use crate::application::repos::{CreateMessageParams, MessagesRepo};
use crate::domain::entities::{MessageRecord, MessageView};
use crate::domain::validation::require_text;

/// Contact messages sent to the site operators.
#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessagesRepo>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessagesRepo>) -> Self {
        Self { messages }
    }

    pub async fn create(
        &self,
        profile_id: Option<i64>,
        subject: Option<&str>,
        message: Option<&str>,
    ) -> Result<MessageRecord, ServiceError> {
        let subject = require_text(subject, "Subject")?;
        let message = require_text(message, "Message")?;
        let record = self
            .messages
            .create_message(CreateMessageParams {
                profile_id,
                subject,
                message,
            })
            .await?;
        info!(message_id = record.id, "Message submitted");
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<MessageView>, ServiceError> {
        Ok(self.messages.list_messages().await?)
    }

    pub async fn find(&self, id: i64) -> Result<MessageView, ServiceError> {
        self.messages
            .find_message(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("message"))
    }
}
