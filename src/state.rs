//! Shared application state injected into every handler.

use std::sync::Arc;

use tracing::Span;

use crate::application::services::{AuthConfig, AuthResource, LinkService};
use crate::domain::store::Store;

/// Handles shared across requests. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub auth: Arc<AuthResource>,
    pub links: Arc<LinkService>,
}

impl AppState {
    /// Wires the services on top of an already migrated store.
    pub fn new(
        store: Arc<dyn Store>,
        auth_config: AuthConfig,
        base_url: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            auth: Arc::new(AuthResource::new(store.clone(), auth_config, span)),
            links: Arc::new(LinkService::new(store.clone(), base_url)),
            store,
        }
    }
}
