//! # NG12 Types
//!
//! Wire and domain types exchanged between the NG12 assessor client and its backend.
//!
//! Every struct here mirrors a JSON body of the backend's HTTP contract:
//! - `GET /patients` returns [`Patient`] records
//! - `POST /assess` takes an [`AssessRequest`] and returns an [`AssessmentResult`]
//! - `POST /chat` takes a [`ChatRequest`] and returns a [`ChatReply`]
//! - `GET /chat/{session_id}/history` returns a [`ChatHistory`]
//! - `GET /health` returns a [`HealthStatus`]
//!
//! Types are immutable once decoded. The client renders [`Citation`]s but never resolves
//! their `chunk_id`.

pub mod assessment;
pub mod chat;
pub mod citation;
pub mod health;
pub mod patient;

pub use assessment::{AssessRequest, AssessmentResult, Recommendation};
pub use chat::{ChatHistory, ChatMessage, ChatReply, ChatRequest, Role};
pub use citation::Citation;
pub use health::HealthStatus;
pub use patient::Patient;

use serde::{Deserialize, Deserializer};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// Text that is guaranteed to hold at least one non-whitespace character.
///
/// Construction trims leading and trailing whitespace, so the stored value is exactly what
/// a chat turn sends over the wire and shows in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] if nothing is left after trimming.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Decodes an absent or `null` list as empty.
///
/// The backend emits `citations: null` for stored user turns and older assessment records.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
