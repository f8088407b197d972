use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::error::RequestError;
use crate::models::group::{CreateGroupRequest, Group, GroupId};
use crate::models::membership::{GroupMember, GroupUser, GroupUserHistory, GroupUserRequest};
use crate::models::StatusResponse;
use crate::server::state::AppState;

pub async fn create_group(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<CreateGroupRequest>, RequestError>,
) -> Result<(StatusCode, Json<Group>), RequestError> {
    let group = state.db_connection.create_group(&request).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

pub async fn get_group(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(group_id), _): WithRejection<Path<GroupId>, RequestError>,
) -> Result<Json<Group>, RequestError> {
    Ok(Json(state.db_connection.get_group(group_id).await?))
}

pub async fn add_group_user(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<GroupUserRequest>, RequestError>,
) -> Result<(StatusCode, Json<GroupUser>), RequestError> {
    let member = state.db_connection.add_group_user(&request).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn remove_group_user(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<GroupUserRequest>, RequestError>,
) -> Result<Json<StatusResponse>, RequestError> {
    state.db_connection.remove_group_user(&request).await?;
    Ok(Json(StatusResponse::new(
        "User removed from group successfully",
    )))
}

pub async fn list_group_users(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(group_id), _): WithRejection<Path<GroupId>, RequestError>,
) -> Result<Json<Vec<GroupMember>>, RequestError> {
    Ok(Json(state.db_connection.list_group_members(group_id).await?))
}

pub async fn list_group_user_history(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(group_id), _): WithRejection<Path<GroupId>, RequestError>,
) -> Result<Json<Vec<GroupUserHistory>>, RequestError> {
    Ok(Json(
        state.db_connection.list_group_user_history(group_id).await?,
    ))
}
