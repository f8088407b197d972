use serde::Serialize;

pub mod group;
pub mod listing;
pub mod membership;
pub mod message;
pub mod user;

/// Plain `{"message": ...}` acknowledgement for operations without a resource to return.
#[derive(Clone, Debug, Serialize)]
pub struct StatusResponse {
    pub message: String,
}

impl StatusResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
