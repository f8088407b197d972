use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub type UserId = i32;
const USER_DISPLAY_NAME_LENGTH_LIMIT: usize = 30;
const USERNAME_LENGTH_LIMIT: usize = 30;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub display_name: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_username(&self.username)?;
        validate_user_display_name(&self.display_name)
    }
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    for ch in username.chars() {
        if !(ch.is_alphanumeric() || ch == '_') {
            return Err(ValidationError::InvalidInput {
                value: username.to_string(),
                reason: "username can only contain letters, numbers and underscores".to_string(),
            });
        }
    }
    if username.is_empty() {
        return Err(ValidationError::InvalidInput {
            value: username.to_string(),
            reason: "username cannot be empty".to_string(),
        });
    }
    if username.chars().count() > USERNAME_LENGTH_LIMIT {
        return Err(ValidationError::InvalidInput {
            value: username.to_string(),
            reason: format!(
                "username cannot be longer than {} chars",
                USERNAME_LENGTH_LIMIT
            ),
        });
    }
    Ok(())
}

pub fn validate_user_display_name(display_name: &str) -> Result<(), ValidationError> {
    if display_name.trim().len() != display_name.len() {
        return Err(ValidationError::InvalidInput {
            value: display_name.to_string(),
            reason: "user display name cannot be surrounded with whitespace characters".to_string(),
        });
    }
    if display_name.is_empty() {
        return Err(ValidationError::InvalidInput {
            value: display_name.to_string(),
            reason: "user display name cannot be empty".to_string(),
        });
    }
    if display_name.chars().count() > USER_DISPLAY_NAME_LENGTH_LIMIT {
        return Err(ValidationError::InvalidInput {
            value: display_name.to_string(),
            reason: format!(
                "user display name cannot be longer than {} chars",
                USER_DISPLAY_NAME_LENGTH_LIMIT
            ),
        });
    }
    Ok(())
}
