use sqlx::{Error as SqlxError, PgExecutor};
use tracing::{debug, instrument};

use crate::database::connection::DbConnection;
use crate::error::RequestError;
use crate::models::group::{Group, GroupId};
use crate::models::listing::ListingMode;
use crate::models::membership::{GroupMember, GroupUserHistory};
use crate::models::message::{
    ListMessagesRequest, ListMessagesResponse, Message, MessageHistory, MessageId,
};
use crate::models::user::{User, UserId};

impl DbConnection {
    pub async fn get_user(&self, user_id: UserId) -> Result<User, RequestError> {
        find_user(self.pool(), user_id)
            .await?
            .ok_or_else(|| RequestError::not_found("User not found"))
    }

    pub async fn get_group(&self, group_id: GroupId) -> Result<Group, RequestError> {
        find_group(self.pool(), group_id)
            .await?
            .ok_or_else(|| RequestError::not_found("Group not found"))
    }

    pub async fn list_group_members(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupMember>, RequestError> {
        self.ensure_group_found(group_id).await?;
        Ok(list_members_of_group(self.pool(), group_id).await?)
    }

    pub async fn list_group_user_history(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<GroupUserHistory>, RequestError> {
        self.ensure_group_found(group_id).await?;
        Ok(list_membership_history_of_group(self.pool(), group_id).await?)
    }

    pub async fn list_messages(
        &self,
        request: &ListMessagesRequest,
    ) -> Result<ListMessagesResponse, RequestError> {
        self.ensure_group_found(request.group_id).await?;
        let response = list_messages_for_group(self.pool(), request).await?;
        debug!(
            "listed {} of at most {} message(s) of group {} with {:?}",
            response.messages.len(),
            request.mode.limit(),
            request.group_id,
            request.mode
        );
        Ok(response)
    }

    pub async fn list_message_history(
        &self,
        message_id: MessageId,
    ) -> Result<Vec<MessageHistory>, RequestError> {
        Ok(list_history_of_message(self.pool(), message_id).await?)
    }

    async fn ensure_group_found(&self, group_id: GroupId) -> Result<(), RequestError> {
        if group_exists(self.pool(), group_id).await? {
            Ok(())
        } else {
            debug!("group {group_id} does not exist");
            Err(RequestError::not_found("Group not found"))
        }
    }
}

pub async fn user_exists<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1);")
        .bind(user_id)
        .fetch_one(executor)
        .await
}

pub async fn group_exists<'a, E: PgExecutor<'a>>(
    executor: E,
    group_id: GroupId,
) -> Result<bool, SqlxError> {
    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1);")
        .bind(group_id)
        .fetch_one(executor)
        .await
}

#[instrument(skip(executor))]
pub async fn find_user<'a, E: PgExecutor<'a>>(
    executor: E,
    user_id: UserId,
) -> Result<Option<User>, SqlxError> {
    sqlx::query_as(
        "SELECT id, username, display_name, created_at FROM users WHERE id = $1;",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn find_group<'a, E: PgExecutor<'a>>(
    executor: E,
    group_id: GroupId,
) -> Result<Option<Group>, SqlxError> {
    sqlx::query_as("SELECT id, name, description, created_at FROM groups WHERE id = $1;")
        .bind(group_id)
        .fetch_optional(executor)
        .await
}

/// Locks the row until the surrounding transaction ends.
#[instrument(skip(executor))]
pub async fn find_message_for_update<'a, E: PgExecutor<'a>>(
    executor: E,
    message_id: MessageId,
) -> Result<Option<Message>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        id, content, user_id, group_id, created_at, edited_at
    FROM
        messages
    WHERE
        id = $1
    FOR UPDATE;
    ",
    )
    .bind(message_id)
    .fetch_optional(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn list_members_of_group<'a, E: PgExecutor<'a>>(
    executor: E,
    group_id: GroupId,
) -> Result<Vec<GroupMember>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        users.id AS user_id, users.username AS username, users.display_name AS display_name,
        group_users.joined_at AS joined_at
    FROM
        group_users JOIN users ON group_users.user_id = users.id
    WHERE
        group_users.group_id = $1
    ORDER BY
        group_users.joined_at, users.id;
    ",
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn list_membership_history_of_group<'a, E: PgExecutor<'a>>(
    executor: E,
    group_id: GroupId,
) -> Result<Vec<GroupUserHistory>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        id, group_id, user_id, action, timestamp
    FROM
        group_user_history
    WHERE
        group_id = $1
    ORDER BY
        id;
    ",
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

#[instrument(skip(executor))]
pub async fn list_messages_for_group<'a, E: PgExecutor<'a>>(
    executor: E,
    request: &ListMessagesRequest,
) -> Result<ListMessagesResponse, SqlxError> {
    let messages: Vec<Message> = match request.mode {
        ListingMode::Page { limit, page } => {
            let skipped = i64::from(page - 1) * i64::from(limit);
            sqlx::query_as(
                "
    SELECT
        id, content, user_id, group_id, created_at, edited_at
    FROM
        messages
    WHERE
        group_id = $1
    ORDER BY
        id
    LIMIT $2 OFFSET $3;
    ",
            )
            .bind(request.group_id)
            .bind(i64::from(limit))
            .bind(skipped)
            .fetch_all(executor)
            .await?
        }
        ListingMode::Offset { offset, limit } => {
            sqlx::query_as(
                "
    SELECT
        id, content, user_id, group_id, created_at, edited_at
    FROM
        messages
    WHERE
        group_id = $1 AND id > $2
    ORDER BY
        id
    LIMIT $3;
    ",
            )
            .bind(request.group_id)
            .bind(offset)
            .bind(limit)
            .fetch_all(executor)
            .await?
        }
    };
    Ok(ListMessagesResponse { messages })
}

#[instrument(skip(executor))]
pub async fn list_history_of_message<'a, E: PgExecutor<'a>>(
    executor: E,
    message_id: MessageId,
) -> Result<Vec<MessageHistory>, SqlxError> {
    sqlx::query_as(
        "
    SELECT
        id, message_id, content, action, action_by, timestamp
    FROM
        message_history
    WHERE
        message_id = $1
    ORDER BY
        id;
    ",
    )
    .bind(message_id)
    .fetch_all(executor)
    .await
}
