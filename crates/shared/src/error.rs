use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by the chat backend, e.g. `{"error": "model unavailable"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    #[error("{0}")]
    Backend(String),
    #[error("response payload has no 'response' field")]
    MissingResponse,
}

impl From<ApiError> for ReplyError {
    fn from(value: ApiError) -> Self {
        Self::Backend(value.error)
    }
}
