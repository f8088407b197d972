use sqlx::{Error as SqlxError, PgExecutor};
use tracing::{info, instrument};

use crate::database::connection::DbConnection;
use crate::database::queries::{find_message_for_update, group_exists, user_exists};
use crate::error::{RequestError, ValidationError};
use crate::models::group::{CreateGroupRequest, Group, GroupId};
use crate::models::membership::{GroupUser, GroupUserRequest, MembershipAction};
use crate::models::message::{
    validate_message_content, DeleteMessageRequest, EditMessageRequest, Message, MessageAction,
    MessageId, SendMessageRequest,
};
use crate::models::user::{CreateUserRequest, User, UserId};

const USER_OR_GROUP_MISSING: &str = "User or Group does not exist";
const USER_MISSING: &str = "User does not exist";
const MESSAGE_NOT_FOUND: &str = "Message not found";

impl DbConnection {
    pub async fn create_user(&self, request: &CreateUserRequest) -> Result<User, RequestError> {
        request.validate()?;
        let user = insert_user(self.pool(), request).await?;
        info!("created user with id: {}", user.id);
        Ok(user)
    }

    pub async fn create_group(&self, request: &CreateGroupRequest) -> Result<Group, RequestError> {
        request.validate()?;
        let group = insert_group(self.pool(), request).await?;
        info!("created group with id: {}", group.id);
        Ok(group)
    }

    pub async fn add_group_user(
        &self,
        request: &GroupUserRequest,
    ) -> Result<GroupUser, RequestError> {
        let mut transaction = self.pool().begin().await?;
        let user_found = user_exists(transaction.as_mut(), request.user_id).await?;
        let group_found = group_exists(transaction.as_mut(), request.group_id).await?;
        if !user_found || !group_found {
            return Err(ValidationError::MissingReference(USER_OR_GROUP_MISSING.into()).into());
        }
        let member = insert_group_user(transaction.as_mut(), request)
            .await?
            .ok_or(ValidationError::AlreadyExists)?;
        insert_group_user_history(
            transaction.as_mut(),
            request.group_id,
            request.user_id,
            MembershipAction::Added,
        )
        .await?;
        transaction.commit().await?;
        info!(
            "added user {} to group {}",
            request.user_id, request.group_id
        );
        Ok(member)
    }

    pub async fn remove_group_user(&self, request: &GroupUserRequest) -> Result<(), RequestError> {
        let mut transaction = self.pool().begin().await?;
        let removed = delete_group_user(transaction.as_mut(), request).await?;
        if !removed {
            return Err(RequestError::not_found("User is not a member of this group"));
        }
        insert_group_user_history(
            transaction.as_mut(),
            request.group_id,
            request.user_id,
            MembershipAction::Removed,
        )
        .await?;
        transaction.commit().await?;
        info!(
            "removed user {} from group {}",
            request.user_id, request.group_id
        );
        Ok(())
    }

    pub async fn send_message(&self, request: &SendMessageRequest) -> Result<Message, RequestError> {
        validate_message_content(&request.content)?;
        if !user_exists(self.pool(), request.user_id).await?
            || !group_exists(self.pool(), request.group_id).await?
        {
            return Err(ValidationError::MissingReference(USER_OR_GROUP_MISSING.into()).into());
        }
        let message = insert_message(self.pool(), request).await?;
        info!(
            "user {} sent message {} to group {}",
            message.user_id, message.id, message.group_id
        );
        Ok(message)
    }

    /// The history row keeps the content as it was before the edit.
    pub async fn edit_message(&self, request: &EditMessageRequest) -> Result<Message, RequestError> {
        validate_message_content(&request.content)?;
        let mut transaction = self.pool().begin().await?;
        let current = find_message_for_update(transaction.as_mut(), request.message_id)
            .await?
            .ok_or_else(|| RequestError::not_found(MESSAGE_NOT_FOUND))?;
        if !user_exists(transaction.as_mut(), request.user_id).await? {
            return Err(ValidationError::MissingReference(USER_MISSING.into()).into());
        }
        insert_message_history(
            transaction.as_mut(),
            current.id,
            &current.content,
            MessageAction::Edited,
            request.user_id,
        )
        .await?;
        let message = update_message_content(transaction.as_mut(), current.id, &request.content)
            .await?;
        transaction.commit().await?;
        info!("user {} edited message {}", request.user_id, message.id);
        Ok(message)
    }

    pub async fn delete_message(&self, request: &DeleteMessageRequest) -> Result<(), RequestError> {
        let mut transaction = self.pool().begin().await?;
        let current = find_message_for_update(transaction.as_mut(), request.message_id)
            .await?
            .ok_or_else(|| RequestError::not_found(MESSAGE_NOT_FOUND))?;
        if !user_exists(transaction.as_mut(), request.user_id).await? {
            return Err(ValidationError::MissingReference(USER_MISSING.into()).into());
        }
        insert_message_history(
            transaction.as_mut(),
            current.id,
            &current.content,
            MessageAction::Deleted,
            request.user_id,
        )
        .await?;
        sqlx::query("DELETE FROM messages WHERE id = $1;")
            .bind(current.id)
            .execute(transaction.as_mut())
            .await?;
        transaction.commit().await?;
        info!("user {} deleted message {}", request.user_id, current.id);
        Ok(())
    }
}

#[instrument(skip_all)]
pub async fn insert_user<'a, E: PgExecutor<'a>>(
    executor: E,
    user: &CreateUserRequest,
) -> Result<User, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO users (username, display_name, created_at)
            VALUES ($1, $2, current_timestamp)
            RETURNING id, username, display_name, created_at;
        ",
    )
    .bind(&user.username)
    .bind(&user.display_name)
    .fetch_one(executor)
    .await
}

#[instrument(skip_all)]
pub async fn insert_group<'a, E: PgExecutor<'a>>(
    executor: E,
    group: &CreateGroupRequest,
) -> Result<Group, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO groups (name, description, created_at)
            VALUES ($1, $2, current_timestamp)
            RETURNING id, name, description, created_at;
        ",
    )
    .bind(&group.name)
    .bind(group.description.as_deref())
    .fetch_one(executor)
    .await
}

/// `None` when the user already belongs to the group.
#[instrument(skip(executor))]
pub async fn insert_group_user<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &GroupUserRequest,
) -> Result<Option<GroupUser>, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO group_users (group_id, user_id, joined_at)
            VALUES ($1, $2, current_timestamp)
            ON CONFLICT ON CONSTRAINT group_user_pkey DO NOTHING
            RETURNING group_id, user_id, joined_at;
        ",
    )
    .bind(request.group_id)
    .bind(request.user_id)
    .fetch_optional(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn delete_group_user<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &GroupUserRequest,
) -> Result<bool, SqlxError> {
    let result = sqlx::query("DELETE FROM group_users WHERE group_id = $1 AND user_id = $2;")
        .bind(request.group_id)
        .bind(request.user_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[instrument(skip(executor))]
pub async fn insert_group_user_history<'a, E: PgExecutor<'a>>(
    executor: E,
    group_id: GroupId,
    user_id: UserId,
    action: MembershipAction,
) -> Result<(), SqlxError> {
    sqlx::query(
        "
            INSERT INTO group_user_history (group_id, user_id, action, timestamp)
            VALUES ($1, $2, $3, current_timestamp);
        ",
    )
    .bind(group_id)
    .bind(user_id)
    .bind(action)
    .execute(executor)
    .await?;
    Ok(())
}

#[instrument(skip_all)]
pub async fn insert_message<'a, E: PgExecutor<'a>>(
    executor: E,
    message: &SendMessageRequest,
) -> Result<Message, SqlxError> {
    sqlx::query_as(
        "
            INSERT INTO messages (content, user_id, group_id, created_at)
            VALUES ($1, $2, $3, current_timestamp)
            RETURNING id, content, user_id, group_id, created_at, edited_at;
        ",
    )
    .bind(&message.content)
    .bind(message.user_id)
    .bind(message.group_id)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor, content))]
pub async fn update_message_content<'a, E: PgExecutor<'a>>(
    executor: E,
    message_id: MessageId,
    content: &str,
) -> Result<Message, SqlxError> {
    sqlx::query_as(
        "
            UPDATE messages SET content = $2, edited_at = current_timestamp
            WHERE id = $1
            RETURNING id, content, user_id, group_id, created_at, edited_at;
        ",
    )
    .bind(message_id)
    .bind(content)
    .fetch_one(executor)
    .await
}

#[instrument(skip(executor, content))]
pub async fn insert_message_history<'a, E: PgExecutor<'a>>(
    executor: E,
    message_id: MessageId,
    content: &str,
    action: MessageAction,
    action_by: UserId,
) -> Result<(), SqlxError> {
    sqlx::query(
        "
            INSERT INTO message_history (message_id, content, action, action_by, timestamp)
            VALUES ($1, $2, $3, $4, current_timestamp);
        ",
    )
    .bind(message_id)
    .bind(content)
    .bind(action)
    .bind(action_by)
    .execute(executor)
    .await?;
    Ok(())
}
