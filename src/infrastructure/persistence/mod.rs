//! PostgreSQL store implementations.
//!
//! Queries go through SQLx prepared statements with bound parameters.
//!
//! # Components
//!
//! - [`PgStore`] - facade owning the pool; connects, pings and migrates
//! - [`PgUserStore`] - user records
//! - [`PgUrlStore`] - short URL records
//! - [`schema`] - versioned DDL and the migrator
//! - [`connection`] - connection URI and pool settings

pub mod connection;
mod db_error;
mod pg_store;
mod pg_url_store;
mod pg_user_store;
pub mod schema;

pub use connection::ConnectionSettings;
pub use pg_store::PgStore;
pub use pg_url_store::PgUrlStore;
pub use pg_user_store::PgUserStore;
