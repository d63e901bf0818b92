//! Chat session identifiers.
//!
//! A chat session is correlated with the backend through a client-generated identifier. It is
//! an opaque correlation key and not a security token, so it is drawn from a fast
//! non-cryptographic RNG.
//!
//! ## Wire form
//! - Length: 36
//! - Five hyphenated groups of lowercase hex: `8-4-4-4-12`
//! - Version nibble (first character of the third group) is `4`
//! - Variant nibble (first character of the fourth group) is one of `8`, `9`, `a`, `b`
//! - Example: `3f2b8c1e-9d4a-4e6b-a1c2-7f8e9d0a1b2c`
//!
//! A [`SessionId`] is created once per chat view and handed by reference to every request
//! scoped to that session. It is never regenerated while the view lives.

mod service;

pub use service::SessionId;

/// Error type for session identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionIdError {
    /// Input is not a hyphenated, lowercase UUID-v4-shaped string.
    #[error("Invalid session id: {0}")]
    InvalidInput(String),
}

/// Result type for session identifier operations.
pub type SessionIdResult<T> = Result<T, SessionIdError>;
