//! In-memory store implementation.
//!
//! Mirrors the PostgreSQL store's contract (unique keys, owner relation,
//! strict deletes, schema lifecycle) without a database. State lives behind
//! one [`tokio::sync::RwLock`] shared by the facade and its sub-stores; every
//! operation takes the lock once, so each call is atomic.

mod memory_store;
mod memory_url_store;
mod memory_user_store;

pub use memory_store::MemoryStore;
pub use memory_url_store::MemoryUrlStore;
pub use memory_user_store::MemoryUserStore;

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entities::{ShortUrl, User};
use crate::domain::store::StoreError;

/// Raised by every operation while the schema is dropped.
#[derive(Debug, thiserror::Error)]
#[error("schema is not migrated")]
pub struct SchemaMissing;

#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    schema_ready: bool,
    last_user_id: i64,
    last_url_id: i64,
    users: BTreeMap<i64, User>,
    urls: BTreeMap<String, ShortUrl>,
}

impl MemoryState {
    fn ensure_schema(&self, operation: &'static str) -> Result<(), StoreError> {
        if self.schema_ready {
            Ok(())
        } else {
            Err(StoreError::backend(operation, SchemaMissing))
        }
    }
}

pub(crate) type SharedState = Arc<RwLock<MemoryState>>;
