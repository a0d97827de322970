use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::{User, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub content: String,
    #[sqlx(try_from = "String")]
    pub sender: User,
    pub created_at: DateTime<Utc>,
}

/// Validated input for sending a chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    content: String,
    sender: User,
}

impl NewMessage {
    pub fn new(content: &str, sender: User) -> Result<Self, ValidationError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        Ok(Self {
            content: content.to_string(),
            sender,
        })
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn sender(&self) -> User {
        self.sender
    }

    pub fn into_message(self, id: i64, created_at: DateTime<Utc>) -> Message {
        Message {
            id,
            content: self.content,
            sender: self.sender,
            created_at,
        }
    }
}
