//! Short URL entity mapping an alias to its target.

use chrono::{DateTime, Utc};
use url::Url;

use crate::domain::store::StoreError;

/// Longest alias a store accepts.
pub const MAX_ALIAS_LENGTH: usize = 64;

/// A short alias pointing at a long URL, owned by one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortUrl {
    pub id: i64,
    pub alias: String,
    pub target: String,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub clicks: i64,
}

impl ShortUrl {
    /// Returns true if the URL has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Returns true if the URL is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }
}

/// Input data for creating a new short URL.
#[derive(Debug, Clone)]
pub struct NewShortUrl {
    pub alias: String,
    pub target: String,
    pub owner_id: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewShortUrl {
    /// Checks the alias and target before the record reaches the backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the alias is empty or too long,
    /// or if the target is not an absolute URL with a host.
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_alias(&self.alias)?;
        validate_target(&self.target)
    }
}

/// Partial update for an existing short URL.
///
/// `None` fields are left unchanged.
/// `expires_at: Some(None)` clears the expiry; `Some(Some(t))` sets it.
#[derive(Debug, Clone, Default)]
pub struct UrlPatch {
    pub target: Option<String>,
    pub expires_at: Option<Option<DateTime<Utc>>>,
}

impl UrlPatch {
    /// Validates the target if the patch changes it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a malformed target.
    pub fn validate(&self) -> Result<(), StoreError> {
        match &self.target {
            Some(target) => validate_target(target),
            None => Ok(()),
        }
    }
}

fn validate_alias(alias: &str) -> Result<(), StoreError> {
    if alias.is_empty() || alias.len() > MAX_ALIAS_LENGTH {
        return Err(StoreError::Validation(format!(
            "alias must be 1-{MAX_ALIAS_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Checks that `target` parses as an absolute URL with a host.
pub fn validate_target(target: &str) -> Result<(), StoreError> {
    let parsed =
        Url::parse(target).map_err(|e| StoreError::Validation(format!("invalid target url: {e}")))?;
    if !parsed.has_host() {
        return Err(StoreError::Validation(format!(
            "target url has no host: {target}"
        )));
    }
    Ok(())
}
