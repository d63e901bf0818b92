//! Guideline citations attached to assessments and chat answers.

use serde::{Deserialize, Serialize};

/// A pointer into a backend-held guideline chunk.
///
/// `chunk_id` is an opaque reference into the backend corpus. The client only shows it
/// for traceability and never dereferences it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: String,
    pub page: u32,
    pub excerpt: String,
    pub chunk_id: String,
}
