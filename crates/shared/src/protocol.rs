use serde::{Deserialize, Serialize};

use crate::{
    domain::SessionId,
    error::{ApiError, ReplyError},
};

pub const CHAT_PATH: &str = "/api/chat";
pub const RESET_PATH: &str = "/api/reset";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    pub session_id: SessionId,
}

/// Body of a `/api/chat` reply. The backend sends either `response` or
/// `error`; any other fields (such as an echoed `session_id`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    /// A non-empty `error` field wins over `response`, regardless of HTTP
    /// status. An empty `error` string counts as no error.
    pub fn into_result(self) -> Result<String, ReplyError> {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return Err(ApiError::new(error).into());
        }
        self.response.ok_or(ReplyError::MissingResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_matches_backend_shape() {
        let request = ChatRequest {
            message: "Hello".into(),
            session_id: SessionId::new("session_1"),
        };
        let value = serde_json::to_value(&request).expect("json");
        assert_eq!(
            value,
            serde_json::json!({ "message": "Hello", "session_id": "session_1" })
        );
    }

    #[test]
    fn reply_with_extra_fields_yields_response() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"Hi there","session_id":"session_1"}"#)
                .expect("decode");
        assert_eq!(reply.into_result(), Ok("Hi there".to_string()));
    }

    #[test]
    fn error_field_takes_precedence() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"ignored","error":"model unavailable"}"#)
                .expect("decode");
        assert_eq!(
            reply.into_result(),
            Err(ReplyError::Backend("model unavailable".into()))
        );
    }

    #[test]
    fn empty_error_field_does_not_hide_response() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"Hi there","error":""}"#).expect("decode");
        assert_eq!(reply.into_result(), Ok("Hi there".to_string()));
    }

    #[test]
    fn null_error_field_is_ignored() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"response":"Hi there","error":null}"#).expect("decode");
        assert_eq!(reply.into_result(), Ok("Hi there".to_string()));
    }

    #[test]
    fn empty_object_is_missing_response() {
        let reply: ChatReply = serde_json::from_str("{}").expect("decode");
        assert_eq!(reply.into_result(), Err(ReplyError::MissingResponse));
    }
}
