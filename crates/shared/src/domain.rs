use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Opaque correlation token sent with every request of one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Millisecond timestamps keep ids unique per client run.
    pub fn generate() -> Self {
        Self(format!("session_{}", Utc::now().timestamp_millis()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

impl TranscriptEntry {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only conversation log. The only removal is a full clear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_role(&self, role: Role) -> usize {
        self.entries.iter().filter(|entry| entry.role == role).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_session_ids_use_session_prefix() {
        let id = SessionId::generate();
        let millis = id
            .as_str()
            .strip_prefix("session_")
            .expect("session_ prefix");
        assert!(millis.parse::<i64>().is_ok(), "unexpected id: {id}");
    }

    #[test]
    fn session_id_serializes_as_plain_string() {
        let id = SessionId::new("session_42");
        assert_eq!(serde_json::to_string(&id).expect("json"), "\"session_42\"");
    }

    #[test]
    fn transcript_keeps_insertion_order_until_cleared() {
        let mut transcript = Transcript::default();
        transcript.push(TranscriptEntry::user("Hello"));
        transcript.push(TranscriptEntry::assistant("Hi there"));

        assert_eq!(
            transcript.entries(),
            &[
                TranscriptEntry::user("Hello"),
                TranscriptEntry::assistant("Hi there")
            ]
        );
        assert_eq!(transcript.count_role(Role::Assistant), 1);

        transcript.clear();
        assert!(transcript.is_empty());
    }
}
