use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{0}")]
    NotFound(String),
    #[error("malformed request: {0}")]
    Malformed(String),
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl RequestError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

#[derive(Clone, Debug, Error)]
pub enum ValidationError {
    #[error("input value is invalid: `{value}`, reason: {reason}")]
    InvalidInput { value: String, reason: String },
    #[error("limit exceeded for {subject}, allowed {limit} {unit}(s), got {attempted}")]
    LimitExceeded {
        subject: String,
        unit: String,
        attempted: usize,
        limit: usize,
    },
    #[error("{0}")]
    MissingReference(String),
    #[error("requested object already exists")]
    AlreadyExists,
}

impl From<JsonRejection> for RequestError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for RequestError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl From<PathRejection> for RequestError {
    fn from(rejection: PathRejection) -> Self {
        Self::Malformed(rejection.body_text())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            Self::Sqlx(e) => match e {
                sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
                sqlx::Error::Database(ref db) if db.is_unique_violation() => (
                    StatusCode::BAD_REQUEST,
                    ValidationError::AlreadyExists.to_string(),
                ),
                e => {
                    error!("received internal error for user request: {e}");
                    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
                }
            },
            Self::Validation(ValidationError::MissingReference(reason)) => {
                (StatusCode::BAD_REQUEST, reason)
            }
            Self::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Malformed(reason) => (StatusCode::BAD_REQUEST, reason),
            Self::NotFound(what) => (StatusCode::NOT_FOUND, what),
        };
        let error = json!({ "error": error });
        (status, axum::Json(error)).into_response()
    }
}
