use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::error::ValidationError;
use crate::models::group::GroupId;
use crate::models::listing::ListingMode;
use crate::models::user::UserId;

pub type MessageId = i64;
pub type MessageHistoryId = i64;
const MESSAGE_CONTENT_LENGTH_LIMIT: usize = 4096;

#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Serialize, Display, EnumIter, AsRefStr, sqlx::Type,
)]
#[sqlx(type_name = "message_action")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageAction {
    Edited,
    Deleted,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub user_id: UserId,
    pub group_id: GroupId,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub content: String,
    pub user_id: UserId,
    pub group_id: GroupId,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMessageRequest {
    pub message_id: MessageId,
    pub content: String,
    pub user_id: UserId,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteMessageRequest {
    pub message_id: MessageId,
    pub user_id: UserId,
}

#[derive(Debug)]
pub struct ListMessagesRequest {
    pub group_id: GroupId,
    pub mode: ListingMode,
}

#[derive(Clone, Debug, Serialize)]
pub struct ListMessagesResponse {
    pub messages: Vec<Message>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MessageHistory {
    pub id: MessageHistoryId,
    pub message_id: MessageId,
    pub content: String,
    pub action: MessageAction,
    pub action_by: UserId,
    pub timestamp: DateTime<Utc>,
}

pub fn validate_message_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::InvalidInput {
            value: content.to_string(),
            reason: "message content cannot be empty".to_string(),
        });
    }
    let length = content.chars().count();
    if length > MESSAGE_CONTENT_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "message content".to_string(),
            unit: "char".to_string(),
            attempted: length,
            limit: MESSAGE_CONTENT_LENGTH_LIMIT,
        });
    }
    Ok(())
}
