//! Chat turn, reply and history bodies.

use crate::{null_as_empty, Citation, NonEmptyText};
use serde::{Deserialize, Serialize};

/// Who authored a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of a chat transcript.
///
/// User entries never carry citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub citations: Vec<Citation>,
}

impl ChatMessage {
    pub fn user(text: NonEmptyText) -> Self {
        Self {
            role: Role::User,
            content: text.into_inner(),
            citations: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            citations,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub session_id: String,
    pub message: String,
    pub top_k: u32,
}

/// Body returned by `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Echo of the request's session, when the backend includes it.
    #[serde(default)]
    pub session_id: Option<String>,
    pub answer: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub citations: Vec<Citation>,
}

/// Body returned by `GET /chat/{session_id}/history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}
