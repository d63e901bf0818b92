//! # NG12 Core
//!
//! Client-side session and interaction state for the NG12 cancer-risk assessor.
//!
//! This crate contains the state machines a view drives and the HTTP contract they speak:
//! - [`PatientDirectory`]: fetches and caches the selectable patients
//! - [`AssessmentOrchestrator`]: patient selection and one assessment cycle at a time
//! - [`ChatSessionManager`]: a multi-turn, citation-grounded conversation with optimistic
//!   turns and compensating rollback
//! - [`citations::render`]: pure display mapping of citations
//!
//! Scheduling is single-threaded and cooperative: a view owns each orchestrator exclusively
//! and suspends only while a backend request is outstanding. Every request can be abandoned
//! through a [`CancelToken`].
//!
//! **No terminal concerns**: rendering, colours and prompts belong in `ng12-cli`.

pub mod assessment;
pub mod backend;
pub mod cancel;
pub mod chat;
pub mod citations;
pub mod config;
pub mod constants;
pub mod directory;
pub mod error;
pub mod transcript;
pub mod urgency;
pub mod validation;

#[cfg(test)]
pub(crate) mod mock;

pub use assessment::{AssessmentOrchestrator, AssessmentStatus, AssessmentTicket};
pub use backend::{Backend, HttpBackend};
pub use cancel::{cancel_pair, CancelHandle, CancelToken};
pub use chat::{ChatSessionManager, ChatStatus, ClearDecision};
pub use citations::CitationCard;
pub use config::ClientConfig;
pub use constants::{CLEAR_CHAT_PROMPT, DEFAULT_API_BASE, DEFAULT_CHAT_TOP_K};
pub use directory::{DirectoryStatus, PatientDirectory};
pub use error::{ClientError, ClientResult, ErrorKind, Operation};
pub use transcript::{PendingTurn, Transcript};
pub use urgency::UrgencyTier;

pub use ng12_types as types;
pub use ng12_uuid::SessionId;
