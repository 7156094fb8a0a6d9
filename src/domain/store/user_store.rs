//! Capability interface for user records.

use async_trait::async_trait;

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::store::StoreError;

/// Store operations over users.
///
/// Users are never physically deleted through this interface.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserStore`] - PostgreSQL implementation
/// - [`crate::infrastructure::memory::MemoryUserStore`] - in-memory implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user and returns it with backend-assigned fields.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if the email is already registered.
    /// Returns [`StoreError::Validation`] if the input is malformed.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Fetches a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no user has this id.
    async fn fetch_by_id(&self, id: i64) -> Result<User, StoreError>;

    /// Fetches a user by login email.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no user has this email.
    async fn fetch_by_email(&self, email: &str) -> Result<User, StoreError>;

    /// Lists users ordered by id.
    ///
    /// `page` is 1-indexed; values below 1 read as the first page.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if `page_size` is below 1 or the
    /// page lies beyond the addressable range. See [`page_offset`].
    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<User>, StoreError>;

    /// Applies a partial update and returns the updated user.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if the user does not exist.
    /// Returns [`StoreError::Conflict`] if the new email is taken.
    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, StoreError>;
}

/// Number of rows to skip for a 1-indexed page.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] for a `page_size` below 1 or an offset
/// that does not fit in an `i64`.
pub fn page_offset(page: i64, page_size: i64) -> Result<i64, StoreError> {
    if page_size < 1 {
        return Err(StoreError::Validation(format!(
            "page size must be at least 1, got {page_size}"
        )));
    }
    (page.max(1) - 1)
        .checked_mul(page_size)
        .ok_or_else(|| StoreError::Validation(format!("page {page} is out of range")))
}
