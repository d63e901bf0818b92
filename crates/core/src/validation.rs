//! Input validation for startup configuration.

use crate::constants::MAX_CHAT_TOP_K;
use crate::{ClientError, ClientResult};
use reqwest::Url;

/// Validates that `input` can serve as the backend root.
///
/// Request paths are appended to the base URL, so it must be absolute, use http or https,
/// and carry no query or fragment that the appended path would end up inside.
///
/// # Errors
///
/// Returns a `ClientError::InvalidConfig` if the URL is unusable.
pub fn validate_base_url(input: &str) -> ClientResult<Url> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ClientError::InvalidConfig("base URL cannot be empty".into()));
    }

    let url = Url::parse(trimmed)
        .map_err(|e| ClientError::InvalidConfig(format!("base URL '{}': {}", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidConfig(format!(
            "base URL must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientError::InvalidConfig(
            "base URL must not contain a query or fragment".into(),
        ));
    }

    Ok(url)
}

/// Validates the number of supporting passages requested per chat turn.
pub fn validate_top_k(top_k: u32) -> ClientResult<()> {
    if top_k == 0 || top_k > MAX_CHAT_TOP_K {
        return Err(ClientError::InvalidConfig(format!(
            "top_k must be between 1 and {}, got {}",
            MAX_CHAT_TOP_K, top_k
        )));
    }
    Ok(())
}
