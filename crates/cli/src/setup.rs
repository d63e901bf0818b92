//! Startup wiring shared by the binaries.

use ng12_core::config::{timeout_from_env_value, top_k_from_env_value};
use ng12_core::{ClientConfig, DEFAULT_API_BASE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the tracing subscriber.
///
/// Output goes to stderr so it never interleaves with rendered views. `RUST_LOG` overrides
/// `default_directive`.
///
/// # Errors
///
/// Returns an error if `default_directive` is not a valid filter directive.
pub fn init_tracing(default_directive: &str) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(default_directive.parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    Ok(())
}

/// Resolves the client configuration from the environment.
///
/// # Environment Variables
/// - `NG12_API_BASE`: backend root (default: "http://127.0.0.1:8000"); `base_url_override`
///   wins when given
/// - `NG12_REQUEST_TIMEOUT_SECS`: per-request timeout; unset means none
/// - `NG12_CHAT_TOP_K`: passages requested per chat turn (default: 5)
pub fn client_config(base_url_override: Option<String>) -> anyhow::Result<ClientConfig> {
    let base_url = base_url_override
        .or_else(|| std::env::var("NG12_API_BASE").ok())
        .unwrap_or_else(|| DEFAULT_API_BASE.into());
    let timeout = timeout_from_env_value(std::env::var("NG12_REQUEST_TIMEOUT_SECS").ok())?;
    let top_k = top_k_from_env_value(std::env::var("NG12_CHAT_TOP_K").ok())?;

    let cfg = ClientConfig::new(&base_url, timeout, top_k)?;
    tracing::debug!(
        "backend {} (timeout {:?}, top_k {})",
        cfg.base_url(),
        cfg.request_timeout(),
        cfg.chat_top_k()
    );
    Ok(cfg)
}
