//! Tracing subscriber setup.
//!
//! There is no global logger handle: components that log take a parent
//! [`Span`] at construction, so each binary decides how output is scoped.

use anyhow::Result;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

/// Installs the global subscriber.
///
/// `RUST_LOG` is read through the config (default `info`); `LOG_FORMAT=json`
/// switches to one JSON object per line.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a subscriber is already
/// installed.
pub fn init(config: &Config) -> Result<()> {
    init_with(&config.log_level, &config.log_format)
}

/// Same as [`init`] for callers without a full [`Config`].
///
/// # Errors
///
/// See [`init`].
pub fn init_with(log_level: &str, log_format: &str) -> Result<()> {
    let env_filter = EnvFilter::try_new(log_level)?;

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer())
            .try_init()?;
    }

    Ok(())
}

/// Parent span for store operations.
pub fn store_span() -> Span {
    tracing::info_span!("store")
}

/// Parent span for authentication events.
pub fn auth_span() -> Span {
    tracing::info_span!("auth")
}
