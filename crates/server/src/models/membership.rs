use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::models::group::GroupId;
use crate::models::user::UserId;

pub type GroupUserHistoryId = i64;

#[derive(
    Clone, Debug, Copy, PartialEq, Eq, Serialize, Display, EnumIter, AsRefStr, sqlx::Type,
)]
#[sqlx(type_name = "group_user_action")]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MembershipAction {
    Added,
    Removed,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUserRequest {
    pub group_id: GroupId,
    pub user_id: UserId,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupUser {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub joined_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user_id: UserId,
    pub username: String,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GroupUserHistory {
    pub id: GroupUserHistoryId,
    pub group_id: GroupId,
    pub user_id: UserId,
    pub action: MembershipAction,
    pub timestamp: DateTime<Utc>,
}
