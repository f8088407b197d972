use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;

use crate::error::RequestError;
use crate::models::user::{CreateUserRequest, User, UserId};
use crate::server::state::AppState;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserRequest>, RequestError>,
) -> Result<(StatusCode, Json<User>), RequestError> {
    let user = state.db_connection.create_user(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    WithRejection(Path(user_id), _): WithRejection<Path<UserId>, RequestError>,
) -> Result<Json<User>, RequestError> {
    Ok(Json(state.db_connection.get_user(user_id).await?))
}
