//! PostgreSQL store facade: connection setup, schema lifecycle and sub-stores.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{Connection, PgPool};
use tracing::{Span, info};

use crate::domain::store::{Store, StoreError, UrlStore, UserStore};
use crate::infrastructure::persistence::connection::{ConnectionSettings, PgHandle};
use crate::infrastructure::persistence::schema;
use crate::infrastructure::persistence::{PgUrlStore, PgUserStore};

/// PostgreSQL implementation of [`Store`].
///
/// Owns the connection pool; [`PgUserStore`] and [`PgUrlStore`] share it
/// through a [`PgHandle`]. Every value of this type has a migrated schema.
pub struct PgStore {
    handle: PgHandle,
    users: PgUserStore,
    urls: PgUrlStore,
}

impl PgStore {
    /// Connects to PostgreSQL, verifies the connection and migrates the schema.
    ///
    /// Operations on the returned store are logged under `span`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Validation`] if the address is malformed
    /// - [`StoreError::Connection`] ("connecting to database") if the driver
    ///   options cannot be built
    /// - [`StoreError::Connection`] ("database connection not found") if the
    ///   ping fails
    /// - [`StoreError::SchemaMigration`] if migration fails
    pub async fn connect(settings: &ConnectionSettings, span: Span) -> Result<Self, StoreError> {
        info!(parent: &span, uri = %settings.redacted_uri(), "Connecting to database");

        let options = settings.connect_options()?;
        let pool = settings.pool_options().connect_lazy_with(options);

        Self::from_pool(pool, settings.operation_timeout, span).await
    }

    /// Builds the store on an already opened pool.
    ///
    /// Runs the same ping and migration steps as [`PgStore::connect`].
    ///
    /// # Errors
    ///
    /// See [`PgStore::connect`].
    pub async fn from_pool(
        pool: PgPool,
        operation_timeout: Duration,
        span: Span,
    ) -> Result<Self, StoreError> {
        let pool = Arc::new(pool);
        ping_pool(&pool).await?;
        info!(parent: &span, "Connected to database");

        let handle = PgHandle::new(pool, operation_timeout, span);
        let store = Self {
            users: PgUserStore::new(handle.clone()),
            urls: PgUrlStore::new(handle.clone()),
            handle,
        };

        store.migrate().await?;

        Ok(store)
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.handle.pool().close().await;
    }
}

async fn ping_pool(pool: &PgPool) -> Result<(), StoreError> {
    const CONTEXT: &str = "database connection not found";

    let mut conn = pool
        .acquire()
        .await
        .map_err(|e| StoreError::connection(CONTEXT, e))?;
    conn.ping()
        .await
        .map_err(|e| StoreError::connection(CONTEXT, e))
}

#[async_trait]
impl Store for PgStore {
    fn users(&self) -> &dyn UserStore {
        &self.users
    }

    fn urls(&self) -> &dyn UrlStore {
        &self.urls
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        schema::migrate(self.handle.pool(), self.handle.span()).await
    }

    async fn drop_schema(&self) -> Result<(), StoreError> {
        schema::drop(self.handle.pool(), self.handle.span()).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.handle
            .run("pinging database", ping_pool(self.handle.pool()))
            .await?
    }
}
