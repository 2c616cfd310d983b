use serde::Serialize;
use serde_json::Value;
use shared::{
    domain::{Role, TranscriptEntry},
    error::ApiError,
    protocol::{ChatReply, ChatRequest, ResetRequest, CHAT_PATH, RESET_PATH},
};
use tracing::{debug, info, warn};

pub mod error;
pub mod session;
pub mod transport;

pub use error::ChatError;
pub use session::{ClientSession, ControllerState};
pub use transport::{ChatTransport, HttpTransport, TransportResponse};

pub const RESET_CONFIRMATION: &str = "Are you sure you want to reset the conversation?";
pub const DEFAULT_ERROR_HINT: &str =
    "Make sure Ollama is running and the llama3.2 model is installed.";

/// Display surface for the conversation and its input controls.
///
/// Content passed to `append_entry` is literal text; implementations must not
/// interpret markup or control sequences in it.
pub trait TranscriptRenderer: Send + Sync {
    fn append_entry(&self, role: Role, text: &str);
    fn show_indicator(&self);
    fn remove_indicator(&self);
    fn clear_and_show_placeholder(&self);
    fn dismiss_placeholder(&self);
    fn set_input_enabled(&self, enabled: bool);
    fn clear_input(&self);
    fn focus_input(&self);
}

/// Blocking yes/no and alert dialogs.
pub trait UserPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
    fn notify_error(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing was rendered or sent.
    Ignored,
    Replied,
    Failed(ChatError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
    Declined,
    Cleared,
    Failed(ChatError),
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    /// Appended to every rendered error; empty disables it.
    pub error_hint: String,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            error_hint: DEFAULT_ERROR_HINT.to_string(),
        }
    }
}

pub fn error_entry_text(err: &ChatError, hint: &str) -> String {
    if hint.trim().is_empty() {
        format!("❌ Error: {err}")
    } else {
        format!("❌ Error: {err}\n\n{hint}")
    }
}

/// Input controls stay disabled while this guard lives. Dropping it hides the
/// indicator if still visible, re-enables and refocuses the input exactly once,
/// and returns the session to `Idle`, on every exit path including unwinding.
struct AwaitingResponse<'a, R: TranscriptRenderer + ?Sized> {
    renderer: &'a R,
    session: &'a mut ClientSession,
    indicator_visible: bool,
}

impl<'a, R: TranscriptRenderer + ?Sized> AwaitingResponse<'a, R> {
    fn begin(renderer: &'a R, session: &'a mut ClientSession) -> Self {
        session.set_state(ControllerState::AwaitingResponse);
        renderer.set_input_enabled(false);
        renderer.show_indicator();
        Self {
            renderer,
            session,
            indicator_visible: true,
        }
    }

    fn complete(&mut self, entry: TranscriptEntry) {
        self.hide_indicator();
        record(self.session, self.renderer, entry);
    }

    fn hide_indicator(&mut self) {
        if std::mem::take(&mut self.indicator_visible) {
            self.renderer.remove_indicator();
        }
    }
}

impl<R: TranscriptRenderer + ?Sized> Drop for AwaitingResponse<'_, R> {
    fn drop(&mut self) {
        self.hide_indicator();
        self.session.set_state(ControllerState::Idle);
        self.renderer.set_input_enabled(true);
        self.renderer.focus_input();
    }
}

fn record<R: TranscriptRenderer + ?Sized>(
    session: &mut ClientSession,
    renderer: &R,
    entry: TranscriptEntry,
) {
    renderer.append_entry(entry.role, &entry.content);
    session.record(entry);
}

fn encode<S: Serialize>(value: &S) -> Result<Value, ChatError> {
    serde_json::to_value(value).map_err(|e| ChatError::Encode(e.to_string()))
}

async fn exchange<T: ChatTransport + ?Sized>(transport: &T, body: Value) -> Result<String, ChatError> {
    let response = transport.post_json(CHAT_PATH, body).await?;
    if !response.is_success() {
        let detail = serde_json::from_str::<ApiError>(&response.body)
            .ok()
            .map(|payload| payload.error);
        return Err(ChatError::HttpStatus {
            status: response.status,
            detail,
        });
    }
    let reply: ChatReply = serde_json::from_str(&response.body)
        .map_err(|e| ChatError::MalformedPayload(e.to_string()))?;
    Ok(reply.into_result()?)
}

/// Drives one conversation: validates input, keeps the transcript, talks to
/// the backend one request at a time and renders every outcome.
///
/// `send` and `reset` take `&mut self`, so at most one request is in flight
/// per controller.
pub struct ChatController<T, R, P>
where
    T: ChatTransport,
    R: TranscriptRenderer,
    P: UserPrompt,
{
    transport: T,
    renderer: R,
    prompt: P,
    session: ClientSession,
    options: ControllerOptions,
}

impl<T, R, P> ChatController<T, R, P>
where
    T: ChatTransport,
    R: TranscriptRenderer,
    P: UserPrompt,
{
    pub fn new(transport: T, renderer: R, prompt: P, session: ClientSession) -> Self {
        Self::with_options(transport, renderer, prompt, session, ControllerOptions::default())
    }

    pub fn with_options(
        transport: T,
        renderer: R,
        prompt: P,
        session: ClientSession,
        options: ControllerOptions,
    ) -> Self {
        Self {
            transport,
            renderer,
            prompt,
            session,
            options,
        }
    }

    pub fn session(&self) -> &ClientSession {
        &self.session
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub async fn send(&mut self, input: &str) -> SendOutcome {
        let message = input.trim();
        if message.is_empty() {
            debug!("chat: ignoring blank input");
            return SendOutcome::Ignored;
        }

        if self.session.take_first_message() {
            self.renderer.dismiss_placeholder();
        }
        record(
            &mut self.session,
            &self.renderer,
            TranscriptEntry::user(message),
        );
        self.renderer.clear_input();

        let request = ChatRequest {
            message: message.to_string(),
            session_id: self.session.id().clone(),
        };
        let session_id = request.session_id.clone();
        info!(session_id = %session_id, chars = message.chars().count(), "chat: sending message");

        let mut awaiting = AwaitingResponse::begin(&self.renderer, &mut self.session);
        let result = match encode(&request) {
            Ok(body) => exchange(&self.transport, body).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(response) => {
                info!(session_id = %session_id, chars = response.chars().count(), "chat: reply received");
                awaiting.complete(TranscriptEntry::assistant(response));
                SendOutcome::Replied
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "chat: request failed");
                awaiting.complete(TranscriptEntry::assistant(error_entry_text(
                    &err,
                    &self.options.error_hint,
                )));
                SendOutcome::Failed(err)
            }
        }
    }

    pub async fn reset(&mut self) -> ResetOutcome {
        if !self.prompt.confirm(RESET_CONFIRMATION) {
            debug!("chat: reset declined");
            return ResetOutcome::Declined;
        }

        let session_id = self.session.id().clone();
        let result = match encode(&ResetRequest {
            session_id: session_id.clone(),
        }) {
            Ok(body) => self.transport.post_json(RESET_PATH, body).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(response) => {
                // The reset body is not interpreted; completing the call is enough.
                info!(session_id = %session_id, status = response.status, "chat: conversation reset");
                self.session.restart_conversation();
                self.renderer.clear_and_show_placeholder();
                ResetOutcome::Cleared
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "chat: reset failed");
                self.prompt
                    .notify_error(&format!("Error resetting conversation: {err}"));
                ResetOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
