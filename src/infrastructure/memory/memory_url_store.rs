//! In-memory URL store.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{Span, debug};

use super::SharedState;
use crate::domain::entities::{NewShortUrl, ShortUrl, UrlPatch};
use crate::domain::store::{StoreError, UrlStore};

/// Short URL records kept in process memory, keyed by alias.
pub struct MemoryUrlStore {
    state: SharedState,
    span: Span,
}

impl MemoryUrlStore {
    pub(crate) fn new(state: SharedState, span: Span) -> Self {
        Self { state, span }
    }
}

#[async_trait]
impl UrlStore for MemoryUrlStore {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, StoreError> {
        new_url.validate()?;
        let mut state = self.state.write().await;
        state.ensure_schema("creating url")?;

        if !state.users.contains_key(&new_url.owner_id) {
            return Err(StoreError::not_found("user", new_url.owner_id.to_string()));
        }
        if state.urls.contains_key(&new_url.alias) {
            return Err(StoreError::conflict("url", new_url.alias));
        }

        state.last_url_id += 1;
        let url = ShortUrl {
            id: state.last_url_id,
            alias: new_url.alias,
            target: new_url.target,
            owner_id: new_url.owner_id,
            created_at: Utc::now(),
            expires_at: new_url.expires_at,
            clicks: 0,
        };
        state.urls.insert(url.alias.clone(), url.clone());
        debug!(parent: &self.span, alias = %url.alias, "Url created");

        Ok(url)
    }

    async fn fetch_by_alias(&self, alias: &str) -> Result<ShortUrl, StoreError> {
        let state = self.state.read().await;
        state.ensure_schema("fetching url")?;

        state
            .urls
            .get(alias)
            .cloned()
            .ok_or_else(|| StoreError::not_found("url", alias))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortUrl>, StoreError> {
        let state = self.state.read().await;
        state.ensure_schema("listing urls")?;

        let mut urls: Vec<ShortUrl> = state
            .urls
            .values()
            .filter(|u| u.owner_id == owner_id)
            .cloned()
            .collect();
        urls.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(urls)
    }

    async fn update(&self, alias: &str, patch: UrlPatch) -> Result<ShortUrl, StoreError> {
        patch.validate()?;
        let mut state = self.state.write().await;
        state.ensure_schema("updating url")?;

        let url = state
            .urls
            .get_mut(alias)
            .ok_or_else(|| StoreError::not_found("url", alias))?;
        apply_patch(url, patch);

        Ok(url.clone())
    }

    async fn delete(&self, alias: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.ensure_schema("deleting url")?;

        state
            .urls
            .remove(alias)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("url", alias))
    }

    async fn update_owned(
        &self,
        owner_id: i64,
        alias: &str,
        patch: UrlPatch,
    ) -> Result<ShortUrl, StoreError> {
        patch.validate()?;
        let mut state = self.state.write().await;
        state.ensure_schema("updating url")?;

        let url = state
            .urls
            .get_mut(alias)
            .filter(|u| u.owner_id == owner_id)
            .ok_or_else(|| StoreError::not_found("url", alias))?;
        apply_patch(url, patch);

        Ok(url.clone())
    }

    async fn delete_owned(&self, owner_id: i64, alias: &str) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        state.ensure_schema("deleting url")?;

        if state.urls.get(alias).is_none_or(|u| u.owner_id != owner_id) {
            return Err(StoreError::not_found("url", alias));
        }
        state.urls.remove(alias);
        debug!(parent: &self.span, alias, owner_id, "Url deleted");

        Ok(())
    }

    async fn record_visit(&self, alias: &str) -> Result<ShortUrl, StoreError> {
        let mut state = self.state.write().await;
        state.ensure_schema("recording visit")?;

        let url = state
            .urls
            .get_mut(alias)
            .ok_or_else(|| StoreError::not_found("url", alias))?;
        if !url.is_expired() {
            url.clicks += 1;
        }

        Ok(url.clone())
    }
}

fn apply_patch(url: &mut ShortUrl, patch: UrlPatch) {
    if let Some(target) = patch.target {
        url.target = target;
    }
    if let Some(expires_at) = patch.expires_at {
        url.expires_at = expires_at;
    }
}
