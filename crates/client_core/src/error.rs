use shared::error::ReplyError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The backend answered with an `error` field.
    #[error("{0}")]
    Backend(String),
    #[error("Failed to get response from server (HTTP {status}{})", detail_suffix(.detail))]
    HttpStatus { status: u16, detail: Option<String> },
    #[error("request did not complete: {0}")]
    Transport(String),
    #[error("malformed response payload: {0}")]
    MalformedPayload(String),
    #[error("failed to encode request body: {0}")]
    Encode(String),
}

fn detail_suffix(detail: &Option<String>) -> String {
    match detail {
        Some(detail) if !detail.is_empty() => format!(": {detail}"),
        _ => String::new(),
    }
}

impl From<ReplyError> for ChatError {
    fn from(value: ReplyError) -> Self {
        match value {
            ReplyError::Backend(message) => Self::Backend(message),
            ReplyError::MissingResponse => Self::MalformedPayload(value.to_string()),
        }
    }
}
