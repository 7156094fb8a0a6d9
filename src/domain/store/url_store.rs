//! Capability interface for short URL records.

use async_trait::async_trait;

use crate::domain::entities::{NewShortUrl, ShortUrl, UrlPatch};
use crate::domain::store::StoreError;

/// Store operations over alias-to-target mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryUrlStore`] - in-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Inserts a new short URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the alias already exists.
    /// Returns [`StoreError::NotFound`] if the owner does not exist.
    /// Returns [`StoreError::Validation`] if the alias or target is malformed.
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, StoreError>;

    /// Fetches a short URL by alias.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the alias does not exist.
    async fn fetch_by_alias(&self, alias: &str) -> Result<ShortUrl, StoreError>;

    /// Lists every URL owned by a user, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortUrl>, StoreError>;

    /// Applies a partial update and returns the updated record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the alias does not exist.
    async fn update(&self, alias: &str, patch: UrlPatch) -> Result<ShortUrl, StoreError>;

    /// Removes a short URL.
    ///
    /// Deleting an alias that is already gone is an error, not a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the alias does not exist.
    async fn delete(&self, alias: &str) -> Result<(), StoreError>;

    /// Applies a partial update only if `owner_id` owns the alias.
    ///
    /// The ownership check and the write are one statement, so a concurrent
    /// delete and re-create by another user cannot be overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the alias does not exist or belongs
    /// to another user.
    async fn update_owned(
        &self,
        owner_id: i64,
        alias: &str,
        patch: UrlPatch,
    ) -> Result<ShortUrl, StoreError>;

    /// Removes a short URL only if `owner_id` owns it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the alias does not exist or belongs
    /// to another user.
    async fn delete_owned(&self, owner_id: i64, alias: &str) -> Result<(), StoreError>;

    /// Counts a visit and returns the record in one round-trip.
    ///
    /// Expired URLs are returned unchanged; their counter is not bumped.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the alias does not exist.
    async fn record_visit(&self, alias: &str) -> Result<ShortUrl, StoreError>;
}
