//! # fupisha
//!
//! A URL shortener built with Axum and PostgreSQL. Users register, log in with
//! a bearer token, and manage the short aliases they own; anyone can follow an
//! alias to its target.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - entities and the [`domain::store::Store`] facade
//! - **Application Layer** ([`application`]) - authentication and link services
//! - **Infrastructure Layer** ([`infrastructure`]) - PostgreSQL and in-memory stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs, and middleware
//!
//! The store owns its schema: a successfully constructed store has already
//! been migrated, so there is no separate migration step before start-up.
//!
//! ## Quick Start
//!
//! ```bash
//! export DB_USER=fupisha DB_PASSWORD=secret DB_NAME=fupisha
//! export TOKEN_SIGNING_SECRET="$(openssl rand -hex 32)"
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;
pub mod telemetry;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AuthConfig, AuthResource, LinkService};
    pub use crate::domain::entities::{NewShortUrl, NewUser, ShortUrl, User};
    pub use crate::domain::store::{Store, StoreError};
    pub use crate::error::AppError;
    pub use crate::infrastructure::memory::MemoryStore;
    pub use crate::infrastructure::persistence::{ConnectionSettings, PgStore};
    pub use crate::state::AppState;
}
