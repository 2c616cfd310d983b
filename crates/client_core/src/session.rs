use shared::domain::{SessionId, Transcript, TranscriptEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// Per-run client state: the correlation id, the transcript and the two
/// lifecycle flags. The id survives resets; only the conversation is cleared.
#[derive(Debug, Clone)]
pub struct ClientSession {
    id: SessionId,
    transcript: Transcript,
    first_message: bool,
    state: ControllerState,
}

impl ClientSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            transcript: Transcript::default(),
            first_message: true,
            state: ControllerState::Idle,
        }
    }

    pub fn generate() -> Self {
        Self::new(SessionId::generate())
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn is_first_message(&self) -> bool {
        self.first_message
    }

    /// Returns true exactly once per conversation.
    pub fn take_first_message(&mut self) -> bool {
        std::mem::replace(&mut self.first_message, false)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn is_in_flight(&self) -> bool {
        self.state == ControllerState::AwaitingResponse
    }

    pub(crate) fn set_state(&mut self, state: ControllerState) {
        self.state = state;
    }

    pub(crate) fn record(&mut self, entry: TranscriptEntry) {
        self.transcript.push(entry);
    }

    pub(crate) fn restart_conversation(&mut self) {
        self.transcript.clear();
        self.first_message = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_message_flag_is_taken_once_and_restored_on_restart() {
        let mut session = ClientSession::new(SessionId::new("session_1"));
        assert!(session.take_first_message());
        assert!(!session.take_first_message());

        session.record(TranscriptEntry::user("Hello"));
        session.restart_conversation();

        assert!(session.is_first_message());
        assert!(session.transcript().is_empty());
        assert_eq!(session.id().as_str(), "session_1");
    }
}
