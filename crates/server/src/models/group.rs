use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub type GroupId = i32;
const GROUP_NAME_LENGTH_LIMIT: usize = 50;
const GROUP_DESCRIPTION_LENGTH_LIMIT: usize = 255;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateGroupRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_group_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_group_description(description)?;
        }
        Ok(())
    }
}

pub fn validate_group_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().len() != name.len() {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: "group name cannot be surrounded with whitespace characters".to_string(),
        });
    }
    if name.is_empty() {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: "group name cannot be empty".to_string(),
        });
    }
    if name.chars().count() > GROUP_NAME_LENGTH_LIMIT {
        return Err(ValidationError::InvalidInput {
            value: name.to_string(),
            reason: format!(
                "group name cannot be longer than {} chars",
                GROUP_NAME_LENGTH_LIMIT
            ),
        });
    }
    Ok(())
}

pub fn validate_group_description(description: &str) -> Result<(), ValidationError> {
    let length = description.chars().count();
    if length > GROUP_DESCRIPTION_LENGTH_LIMIT {
        return Err(ValidationError::LimitExceeded {
            subject: "group description".to_string(),
            unit: "char".to_string(),
            attempted: length,
            limit: GROUP_DESCRIPTION_LENGTH_LIMIT,
        });
    }
    Ok(())
}
