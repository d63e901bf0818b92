//! Chat session management.
//!
//! A [`ChatSessionManager`] owns one session identity for the lifetime of its view and an
//! ordered [`Transcript`]. Each turn is applied optimistically and compensated on failure, so
//! the transcript never shows a user turn the backend did not answer.
//!
//! Only one request may be outstanding per manager. `submit`, `clear` and `resync` fail fast
//! with [`ClientError::Busy`] while another is in flight, rather than relying on the view to
//! disable its controls.

use crate::cancel::CancelToken;
use crate::error::Operation;
use crate::transcript::{PendingTurn, Transcript};
use crate::{Backend, ClientConfig, ClientError, ClientResult};
use ng12_types::{ChatMessage, ChatReply, ChatRequest, NonEmptyText};
use ng12_uuid::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatStatus {
    #[default]
    Idle,
    /// A chat turn is outstanding.
    Sending,
    /// A history deletion is outstanding.
    Clearing,
    /// A history fetch is outstanding.
    Syncing,
}

impl ChatStatus {
    fn busy_operation(self) -> Option<Operation> {
        match self {
            Self::Idle => None,
            Self::Sending => Some(Operation::Chat),
            Self::Clearing => Some(Operation::ClearChat),
            Self::Syncing => Some(Operation::ChatHistory),
        }
    }
}

/// The user's answer to the clear-history confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearDecision {
    Confirmed,
    Declined,
}

pub struct ChatSessionManager<B> {
    backend: B,
    session_id: SessionId,
    top_k: u32,
    transcript: Transcript,
    pending_input: String,
    status: ChatStatus,
    error_message: Option<String>,
}

impl<B: Backend> ChatSessionManager<B> {
    /// Creates a manager with a freshly generated session identity.
    pub fn new(backend: B, cfg: &ClientConfig) -> Self {
        Self::with_session_id(backend, cfg, SessionId::generate())
    }

    /// Creates a manager bound to an existing session identity.
    pub fn with_session_id(backend: B, cfg: &ClientConfig, session_id: SessionId) -> Self {
        tracing::debug!("chat session {}", session_id);
        Self {
            backend,
            session_id,
            top_k: cfg.chat_top_k(),
            transcript: Transcript::new(),
            pending_input: String::new(),
            status: ChatStatus::Idle,
            error_message: None,
        }
    }

    /// Resumes the session identified by `session_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SessionId`] if `session_id` is not a canonical v4 identifier.
    pub fn resume(backend: B, cfg: &ClientConfig, session_id: &str) -> ClientResult<Self> {
        let session_id = SessionId::parse(session_id)?;
        Ok(Self::with_session_id(backend, cfg, session_id))
    }

    fn ensure_idle(&self) -> ClientResult<()> {
        match self.status.busy_operation() {
            Some(op) => Err(ClientError::Busy(op)),
            None => Ok(()),
        }
    }

    /// Appends the user turn optimistically and moves into `Sending`.
    ///
    /// Blank text is a no-op returning [`ClientError::EmptyMessage`]; a call while another
    /// request is outstanding returns [`ClientError::Busy`]. Neither changes any state.
    pub fn begin_submit(&mut self, text: &str) -> ClientResult<(PendingTurn, ChatRequest)> {
        self.ensure_idle()?;
        let message = NonEmptyText::new(text).map_err(|_| ClientError::EmptyMessage)?;

        let turn = self
            .transcript
            .push_pending(message)
            .ok_or(ClientError::Busy(Operation::Chat))?;
        self.pending_input.clear();
        self.status = ChatStatus::Sending;
        self.error_message = None;

        let request = ChatRequest {
            session_id: self.session_id.to_string(),
            message: turn.message().to_string(),
            top_k: self.top_k,
        };
        Ok((turn, request))
    }

    /// Completes `turn`: commits the reply, or rolls the user turn back and records the error.
    ///
    /// A turn this manager did not issue is ignored: no state changes and the outcome is
    /// passed through.
    pub fn finish_submit(
        &mut self,
        turn: PendingTurn,
        outcome: ClientResult<ChatReply>,
    ) -> ClientResult<()> {
        if !self.transcript.owns(&turn) {
            tracing::warn!(
                "ignoring completion of a turn not issued by session {}",
                self.session_id
            );
            return outcome.map(|_| ());
        }
        self.status = ChatStatus::Idle;

        match outcome {
            Ok(reply) => {
                if let Some(echo) = reply.session_id.as_deref() {
                    if echo != self.session_id.to_string() {
                        tracing::warn!(
                            "chat reply for session {} carried session {}",
                            self.session_id,
                            echo
                        );
                    }
                }
                tracing::info!(
                    "chat turn answered with {} citations",
                    reply.citations.len()
                );
                self.transcript.commit(turn, reply);
                Ok(())
            }
            Err(err) => {
                if matches!(err, ClientError::Cancelled) {
                    tracing::warn!(
                        "chat turn cancelled; the backend may still record it for session {}",
                        self.session_id
                    );
                } else {
                    tracing::warn!("chat turn failed: {}", err);
                }
                self.transcript.rollback(turn);
                self.error_message = Some(format!("Error: {}", err));
                Err(err)
            }
        }
    }

    /// Sends one chat turn and integrates the reply.
    ///
    /// On any failure (including cancellation) the optimistic user turn is removed again and
    /// `error_message` is set. The submitted text is not restored to `pending_input`.
    pub async fn submit(&mut self, text: &str, cancel: &CancelToken) -> ClientResult<()> {
        let (turn, request) = self.begin_submit(text)?;
        let outcome = cancel.run(self.backend.chat(&request)).await;
        self.finish_submit(turn, outcome)
    }

    /// Submits whatever is in `pending_input`.
    pub async fn submit_pending(&mut self, cancel: &CancelToken) -> ClientResult<()> {
        let text = self.pending_input.clone();
        self.submit(&text, cancel).await
    }

    /// Deletes the session's server-side history and empties the local transcript.
    ///
    /// Only acts on [`ClearDecision::Confirmed`]. The local transcript is emptied even when
    /// the deletion fails; the failure is still surfaced through `error_message` and returned.
    /// The session identity is kept, so later turns reuse it.
    pub async fn clear(
        &mut self,
        decision: ClearDecision,
        cancel: &CancelToken,
    ) -> ClientResult<()> {
        if decision == ClearDecision::Declined {
            return Ok(());
        }
        self.ensure_idle()?;

        self.status = ChatStatus::Clearing;
        let outcome = cancel.run(self.backend.clear_chat(&self.session_id)).await;
        self.status = ChatStatus::Idle;
        self.transcript.clear();

        match outcome {
            Ok(()) => {
                tracing::info!("cleared chat session {}", self.session_id);
                self.error_message = None;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(
                    "clearing session {} failed, local transcript emptied anyway: {}",
                    self.session_id,
                    err
                );
                self.error_message = Some(format!("Error clearing chat: {}", err));
                Err(err)
            }
        }
    }

    /// Replaces the local transcript with the backend's record for this session.
    ///
    /// On failure the local transcript is kept as it was.
    pub async fn resync(&mut self, cancel: &CancelToken) -> ClientResult<()> {
        self.ensure_idle()?;

        self.status = ChatStatus::Syncing;
        let outcome = cancel.run(self.backend.chat_history(&self.session_id)).await;
        self.status = ChatStatus::Idle;

        match outcome {
            Ok(history) => {
                tracing::info!(
                    "resynced session {} ({} messages)",
                    self.session_id,
                    history.messages.len()
                );
                self.transcript.replace(history.messages);
                self.error_message = None;
                Ok(())
            }
            Err(err) => {
                self.error_message = Some(format!("Error loading history: {}", err));
                Err(err)
            }
        }
    }

    pub fn set_pending_input(&mut self, text: impl Into<String>) {
        self.pending_input = text.into();
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    pub fn status(&self) -> ChatStatus {
        self.status
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}
