use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::error::RequestError;
use crate::models::group::GroupId;
use crate::models::listing::{ListingMode, ListingQuery};
use crate::models::message::{
    DeleteMessageRequest, EditMessageRequest, ListMessagesRequest, ListMessagesResponse, Message,
    MessageHistory, MessageId, SendMessageRequest,
};
use crate::models::StatusResponse;
use crate::server::state::AppState;

pub async fn send_message(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<SendMessageRequest>, RequestError>,
) -> Result<(StatusCode, Json<Message>), RequestError> {
    let message = state.db_connection.send_message(&request).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn edit_message(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<EditMessageRequest>, RequestError>,
) -> Result<Json<Message>, RequestError> {
    Ok(Json(state.db_connection.edit_message(&request).await?))
}

pub async fn delete_message(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<DeleteMessageRequest>, RequestError>,
) -> Result<Json<StatusResponse>, RequestError> {
    state.db_connection.delete_message(&request).await?;
    Ok(Json(StatusResponse::new("Message deleted successfully")))
}

pub async fn list_group_messages(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(group_id), _): WithRejection<Path<GroupId>, RequestError>,
    WithRejection(Query(query), _): WithRejection<Query<ListingQuery>, RequestError>,
) -> Result<Json<ListMessagesResponse>, RequestError> {
    let request = ListMessagesRequest {
        group_id,
        mode: ListingMode::from_query(query)?,
    };
    Ok(Json(state.db_connection.list_messages(&request).await?))
}

pub async fn list_message_history(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(message_id), _): WithRejection<Path<MessageId>, RequestError>,
) -> Result<Json<Vec<MessageHistory>>, RequestError> {
    Ok(Json(
        state.db_connection.list_message_history(message_id).await?,
    ))
}
