//! In-memory store facade.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{Span, info};

use super::{MemoryState, MemoryUrlStore, MemoryUserStore, SharedState};
use crate::domain::store::{Store, StoreError, UrlStore, UserStore};

/// In-memory implementation of [`Store`].
///
/// Dropping the schema discards every record and restarts id assignment,
/// matching what `DROP TABLE` does to the PostgreSQL backend.
pub struct MemoryStore {
    state: SharedState,
    users: MemoryUserStore,
    urls: MemoryUrlStore,
    span: Span,
}

impl MemoryStore {
    /// Creates an empty store with its schema already migrated.
    pub fn new(span: Span) -> Self {
        let state = Arc::new(RwLock::new(MemoryState {
            schema_ready: true,
            ..MemoryState::default()
        }));

        Self {
            users: MemoryUserStore::new(state.clone(), span.clone()),
            urls: MemoryUrlStore::new(state.clone(), span.clone()),
            state,
            span,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(Span::none())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn users(&self) -> &dyn UserStore {
        &self.users
    }

    fn urls(&self) -> &dyn UrlStore {
        &self.urls
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        self.state.write().await.schema_ready = true;
        info!(parent: &self.span, "Schema migrated");
        Ok(())
    }

    async fn drop_schema(&self) -> Result<(), StoreError> {
        *self.state.write().await = MemoryState::default();
        info!(parent: &self.span, "Schema dropped");
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
