//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the backend and the
//! chat session manager. Library code never reads environment variables while a request is
//! being handled; the `*_from_env_value` helpers only parse values a binary has already read.

use crate::constants::{DEFAULT_API_BASE, DEFAULT_CHAT_TOP_K};
use crate::validation::{validate_base_url, validate_top_k};
use crate::{ClientError, ClientResult};
use reqwest::Url;
use std::time::Duration;

/// Client configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    request_timeout: Option<Duration>,
    chat_top_k: u32,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Root of the backend; request paths are appended to it.
    /// * `request_timeout` - Per-request timeout. `None` lets a slow backend keep a request
    ///   outstanding indefinitely.
    /// * `chat_top_k` - Supporting passages requested per chat turn.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidConfig`] if the base URL is not an absolute http(s) URL
    /// without query or fragment, or if `chat_top_k` is out of range.
    pub fn new(
        base_url: &str,
        request_timeout: Option<Duration>,
        chat_top_k: u32,
    ) -> ClientResult<Self> {
        let base_url = validate_base_url(base_url)?;
        validate_top_k(chat_top_k)?;

        if request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ClientError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            base_url,
            request_timeout,
            chat_top_k,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    pub fn chat_top_k(&self) -> u32 {
        self.chat_top_k
    }

    /// Joins a root-relative path onto the base URL, keeping any base path prefix.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            request_timeout: None,
            chat_top_k: DEFAULT_CHAT_TOP_K,
        }
    }
}

/// Parse the request timeout (whole seconds) from an optional string value.
///
/// `None` or empty/whitespace means no timeout.
pub fn timeout_from_env_value(value: Option<String>) -> ClientResult<Option<Duration>> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    value
        .map(|v| {
            v.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                ClientError::InvalidConfig(format!(
                    "request timeout must be a whole number of seconds, got '{}'",
                    v
                ))
            })
        })
        .transpose()
}

/// Parse the chat `top_k` from an optional string value.
///
/// `None` or empty/whitespace yields [`DEFAULT_CHAT_TOP_K`].
pub fn top_k_from_env_value(value: Option<String>) -> ClientResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(v) = value else {
        return Ok(DEFAULT_CHAT_TOP_K);
    };

    let top_k = v
        .parse::<u32>()
        .map_err(|_| ClientError::InvalidConfig(format!("top_k must be an integer, got '{}'", v)))?;
    validate_top_k(top_k)?;
    Ok(top_k)
}
