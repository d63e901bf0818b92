//! Ordered chat transcript with optimistic user turns.
//!
//! A user turn is shown as soon as it is submitted, before the backend has confirmed it. The
//! optimistic append is modelled as a [`PendingTurn`] command issued by
//! [`Transcript::push_pending`], which must be completed exactly once:
//! - [`Transcript::commit`] keeps the user turn and appends the assistant reply.
//! - [`Transcript::rollback`] undoes the append, truncating back to the length the transcript
//!   had before the turn was pushed.
//!
//! While a turn is pending no other entry may be appended, so rollback restores the exact
//! pre-submit transcript. A turn only completes against the transcript that issued it; any
//! other transcript ignores it.

use ng12_types::{ChatMessage, ChatReply, NonEmptyText};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TRANSCRIPT_ID: AtomicU64 = AtomicU64::new(1);

/// An optimistic user turn awaiting backend confirmation.
#[derive(Debug)]
#[must_use = "a pending turn must be committed or rolled back"]
pub struct PendingTurn {
    owner: u64,
    index: usize,
    message: NonEmptyText,
}

impl PendingTurn {
    /// The trimmed text that was appended and is being sent.
    pub fn message(&self) -> &NonEmptyText {
        &self.message
    }

    /// Transcript length before the turn was appended.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Debug)]
pub struct Transcript {
    id: u64,
    messages: Vec<ChatMessage>,
    pending: bool,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            id: NEXT_TRANSCRIPT_ID.fetch_add(1, Ordering::Relaxed),
            messages: Vec::new(),
            pending: false,
        }
    }

    /// Appends `text` as a user turn and returns the command that completes it.
    ///
    /// Returns `None` while another turn is pending.
    pub fn push_pending(&mut self, text: NonEmptyText) -> Option<PendingTurn> {
        if self.pending {
            return None;
        }

        let index = self.messages.len();
        self.messages.push(ChatMessage::user(text.clone()));
        self.pending = true;
        Some(PendingTurn {
            owner: self.id,
            index,
            message: text,
        })
    }

    /// Whether `turn` is the turn currently pending on this transcript.
    pub fn owns(&self, turn: &PendingTurn) -> bool {
        self.pending && turn.owner == self.id && self.messages.len() == turn.index + 1
    }

    /// Confirms the pending turn and appends the assistant reply after it.
    ///
    /// Returns `false` and changes nothing if `turn` was not issued by this transcript.
    pub fn commit(&mut self, turn: PendingTurn, reply: ChatReply) -> bool {
        if !self.owns(&turn) {
            return false;
        }
        self.pending = false;
        self.messages
            .push(ChatMessage::assistant(reply.answer, reply.citations));
        true
    }

    /// Removes the pending user turn, restoring the pre-submit transcript.
    ///
    /// Returns `false` and changes nothing if `turn` was not issued by this transcript.
    pub fn rollback(&mut self, turn: PendingTurn) -> bool {
        if !self.owns(&turn) {
            return false;
        }
        self.pending = false;
        self.messages.truncate(turn.index);
        true
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Empties the transcript. Has no effect while a turn is pending.
    pub fn clear(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.messages.clear();
        true
    }

    /// Replaces the transcript with `messages`. Has no effect while a turn is pending.
    pub fn replace(&mut self, messages: Vec<ChatMessage>) -> bool {
        if self.pending {
            return false;
        }
        self.messages = messages;
        true
    }
}
