//! Canonical form for link targets.

use url::Url;

/// Why a target URL was refused.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("Only HTTP and HTTPS targets are allowed")]
    UnsupportedScheme,

    #[error("Target URL must include a host")]
    MissingHost,

    #[error("Target URL must not embed credentials")]
    EmbeddedCredentials,
}

/// Normalizes a link target.
///
/// The scheme must be `http` or `https` and the URL must not carry
/// credentials. The host is lowercased, a default port is stripped and the
/// fragment is removed. Path and query are kept as given.
///
/// # Errors
///
/// Returns a [`TargetError`] describing the first rule the input breaks.
pub fn normalize_target(input: &str) -> Result<String, TargetError> {
    let mut url = Url::parse(input.trim())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(TargetError::UnsupportedScheme);
    }
    if !url.has_host() {
        return Err(TargetError::MissingHost);
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(TargetError::EmbeddedCredentials);
    }

    // The parser already lowercases domain hosts and drops default ports for
    // special schemes; only the fragment is left to strip.
    url.set_fragment(None);

    Ok(url.into())
}
