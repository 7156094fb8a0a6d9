//! Store capability traits for the domain layer.
//!
//! [`Store`] is the facade the rest of the service talks to. It owns one
//! backend session and hands out capability-scoped views of it through
//! [`Store::users`] and [`Store::urls`]; the raw connection never leaves the
//! implementation.
//!
//! # Implementations
//!
//! - [`crate::infrastructure::persistence::PgStore`] - PostgreSQL, used in production
//! - [`crate::infrastructure::memory::MemoryStore`] - in-memory, used in tests
//!
//! A successfully constructed store always has its schema migrated.

pub mod error;
pub mod url_store;
pub mod user_store;

use async_trait::async_trait;

pub use error::{BoxError, SchemaPhase, StoreError};
pub use url_store::UrlStore;
pub use user_store::UserStore;

#[cfg(test)]
pub use url_store::MockUrlStore;
#[cfg(test)]
pub use user_store::MockUserStore;

/// Aggregate handle over the user and URL stores.
#[async_trait]
pub trait Store: Send + Sync {
    /// User records.
    fn users(&self) -> &dyn UserStore;

    /// Short URL records.
    fn urls(&self) -> &dyn UrlStore;

    /// Applies the schema. Safe to call on an already migrated backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SchemaMigration`] with [`SchemaPhase::Migrate`]
    /// on the first failing statement.
    async fn migrate(&self) -> Result<(), StoreError>;

    /// Removes the schema and every record in it.
    ///
    /// Store operations fail until [`Store::migrate`] runs again.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SchemaMigration`] with [`SchemaPhase::Drop`]
    /// on the first failing statement.
    async fn drop_schema(&self) -> Result<(), StoreError>;

    /// Drops then migrates the schema. Destructive.
    async fn reset(&self) -> Result<(), StoreError> {
        self.drop_schema().await?;
        self.migrate().await
    }

    /// Verifies the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
