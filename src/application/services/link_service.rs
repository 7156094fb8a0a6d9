//! Short URL creation, resolution and owner-scoped management.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::entities::{NewShortUrl, ShortUrl, UrlPatch};
use crate::domain::store::{Store, StoreError};
use crate::error::AppError;
use crate::utils::alias::{generate_alias, validate_custom_alias};
use crate::utils::url_normalizer::normalize_target;

/// Attempts at a random alias before giving up.
const MAX_ALIAS_ATTEMPTS: usize = 10;

/// Service for creating and managing short URLs.
///
/// Every mutating call is scoped to an owner. A URL that belongs to someone
/// else is reported as missing, never as forbidden.
pub struct LinkService {
    store: Arc<dyn Store>,
    base_url: String,
}

impl LinkService {
    /// Creates a link service publishing short URLs under `base_url`.
    pub fn new(store: Arc<dyn Store>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short URL for `owner_id`.
    ///
    /// The target is normalized first. With `custom_alias` the alias is
    /// validated and used as-is; otherwise a random one is generated, with up
    /// to ten attempts on collision.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a bad target, alias or expiry, and
    /// [`AppError::Conflict`] if a custom alias is taken.
    pub async fn shorten(
        &self,
        owner_id: i64,
        target: &str,
        custom_alias: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ShortUrl, AppError> {
        let target = normalize(target)?;
        check_expiry(expires_at)?;

        if let Some(alias) = custom_alias {
            validate_custom_alias(&alias)?;
            let new_url = NewShortUrl {
                alias: alias.clone(),
                target,
                owner_id,
                expires_at,
            };
            return self
                .store
                .urls()
                .create(new_url)
                .await
                .map_err(|e| alias_error(e, &alias));
        }

        for _ in 0..MAX_ALIAS_ATTEMPTS {
            let new_url = NewShortUrl {
                alias: generate_alias()?,
                target: target.clone(),
                owner_id,
                expires_at,
            };

            match self.store.urls().create(new_url).await {
                Ok(url) => return Ok(url),
                Err(StoreError::Conflict { key, .. }) => {
                    tracing::debug!(alias = %key, "Generated alias collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique alias",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Looks up an alias for redirection and counts the visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown alias and
    /// [`AppError::Gone`] for an expired one.
    pub async fn resolve(&self, alias: &str) -> Result<ShortUrl, AppError> {
        let url = self
            .store
            .urls()
            .record_visit(alias)
            .await
            .map_err(|e| alias_error(e, alias))?;

        if url.is_expired() {
            return Err(AppError::gone(
                "Short URL has expired",
                json!({ "alias": alias, "expired_at": url.expires_at }),
            ));
        }

        Ok(url)
    }

    /// Lists the owner's URLs, newest first.
    pub async fn list(&self, owner_id: i64) -> Result<Vec<ShortUrl>, AppError> {
        Ok(self.store.urls().list_by_owner(owner_id).await?)
    }

    /// Applies a partial update to one of the owner's URLs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias is missing or owned by
    /// someone else, and [`AppError::Validation`] for a bad target or expiry.
    pub async fn update(
        &self,
        owner_id: i64,
        alias: &str,
        mut patch: UrlPatch,
    ) -> Result<ShortUrl, AppError> {
        if let Some(target) = patch.target.as_deref() {
            patch.target = Some(normalize(target)?);
        }
        if let Some(expires_at) = patch.expires_at {
            check_expiry(expires_at)?;
        }

        self.store
            .urls()
            .update_owned(owner_id, alias, patch)
            .await
            .map_err(|e| alias_error(e, alias))
    }

    /// Deletes one of the owner's URLs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the alias is missing or owned by
    /// someone else.
    pub async fn delete(&self, owner_id: i64, alias: &str) -> Result<(), AppError> {
        self.store
            .urls()
            .delete_owned(owner_id, alias)
            .await
            .map_err(|e| alias_error(e, alias))
    }

    /// Public short URL for an alias.
    pub fn short_url(&self, alias: &str) -> String {
        format!("{}/{}", self.base_url, alias)
    }
}

fn normalize(target: &str) -> Result<String, AppError> {
    normalize_target(target).map_err(|e| {
        AppError::bad_request("Invalid target URL", json!({ "reason": e.to_string() }))
    })
}

fn check_expiry(expires_at: Option<DateTime<Utc>>) -> Result<(), AppError> {
    if let Some(at) = expires_at
        && at <= Utc::now()
    {
        return Err(AppError::bad_request(
            "Expiry must be in the future",
            json!({ "expires_at": at }),
        ));
    }
    Ok(())
}

fn url_not_found(alias: &str) -> AppError {
    AppError::not_found("Short URL not found", json!({ "alias": alias }))
}

/// Rephrases alias-keyed store errors; everything else maps as usual.
fn alias_error(e: StoreError, alias: &str) -> AppError {
    match e {
        StoreError::NotFound { entity: "url", .. } => url_not_found(alias),
        StoreError::Conflict { entity: "url", .. } => {
            AppError::conflict("Alias is already taken", json!({ "alias": alias }))
        }
        other => other.into(),
    }
}
