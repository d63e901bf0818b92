//! Constants used throughout the NG12 client core.

/// Backend base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Supporting passages requested per chat turn when none is configured.
pub const DEFAULT_CHAT_TOP_K: u32 = 5;

/// Largest accepted `top_k`.
pub const MAX_CHAT_TOP_K: u32 = 50;

/// Confirmation prompt shown before a chat session is cleared.
pub const CLEAR_CHAT_PROMPT: &str = "Clear chat history?";

pub const PATIENTS_PATH: &str = "/patients";
pub const ASSESS_PATH: &str = "/assess";
pub const CHAT_PATH: &str = "/chat";
pub const HEALTH_PATH: &str = "/health";
